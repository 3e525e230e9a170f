//! Named registry of loaded relations

use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::Config;
use crate::decl::{Builtin, Declarations, Type};
use crate::error::{Error, Result};
use crate::ingest::{self, LoadStats};
use crate::model::{is_identifier, Relation, Schema};

/// Outcome of a successful [`Store::add`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Name the relation was stored under
    pub name: String,
    pub fields: usize,
    pub stats: LoadStats,
}

#[derive(Debug, Clone)]
struct Entry {
    schema: Schema,
    rows: Arc<Relation>,
}

/// Registry mapping relation names to their schema and rows.
///
/// A store is owned by whoever drives loading and is handed by reference to
/// the evaluation side. Loading takes `&mut self`, so loads are serialized.
#[derive(Debug, Default)]
pub struct Store {
    config: Config,
    entries: IndexMap<String, Entry>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            entries: IndexMap::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Check whether a relation is stored under `name`
    pub fn is_defined(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Load `path` and store it under its relation name.
    ///
    /// On failure the store is left untouched. Loading a name that already
    /// exists replaces the previous schema and rows together.
    pub fn add(&mut self, path: impl AsRef<Path>) -> Result<LoadReport> {
        let path = path.as_ref();
        let name = relation_name(path)?;

        let (schema, rows, stats) = ingest::load_file(path, &self.config)?;

        let report = LoadReport {
            name: name.clone(),
            fields: schema.len(),
            stats,
        };
        info!("stored {} (recs {})", name, rows.len());
        self.entries.insert(
            name,
            Entry {
                schema,
                rows: Arc::new(rows),
            },
        );

        Ok(report)
    }

    /// Load several files in turn, logging and skipping the ones that fail
    pub fn add_all<I, P>(&mut self, paths: I) -> Vec<(PathBuf, Result<LoadReport>)>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        paths
            .into_iter()
            .map(|path| {
                let path = path.as_ref().to_path_buf();
                let result = self.add(&path);
                if let Err(e) = &result {
                    warn!("{}", e);
                }
                (path, result)
            })
            .collect()
    }

    pub fn schema(&self, name: &str) -> Option<&Schema> {
        self.entries.get(name).map(|e| &e.schema)
    }

    pub fn relation(&self, name: &str) -> Option<&Relation> {
        self.entries.get(name).map(|e| e.rows.as_ref())
    }

    /// Stored names, in first-load order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of stored relations
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build a fresh declaration set: every stored relation plus the built-ins
    pub fn declarations(&self) -> Declarations {
        let mut decls = Declarations::new();
        for (name, entry) in &self.entries {
            decls.declare(
                name.clone(),
                Arc::clone(&entry.rows),
                Type::List(entry.schema.clone()),
            );
        }

        for builtin in Builtin::ALL {
            decls.add_func(builtin.decl());
        }

        decls
    }
}

/// Derive a relation name from a file path: the base name up to its first dot.
///
/// A leading dot is kept, so hidden files never yield a valid name.
pub fn relation_name(path: &Path) -> Result<String> {
    let base = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let name = match base.find('.') {
        Some(dot) if dot > 0 => &base[..dot],
        _ => base.as_str(),
    };

    if !is_identifier(name) {
        return Err(Error::InvalidName {
            name: name.to_string(),
        });
    }

    Ok(name.to_string())
}

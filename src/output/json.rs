//! JSON output format

use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use crate::model::{Field, Row};
use crate::store::Store;

use super::OutputFormatter;

/// JSON output formatter
pub struct JsonOutput {
    pretty: bool,
}

impl JsonOutput {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct JsonRelation<'a> {
    name: &'a str,
    fields: &'a [Field],
    rows: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    preview: Option<&'a [Row]>,
}

#[derive(Serialize)]
struct JsonStoreOutput<'a> {
    relations: Vec<JsonRelation<'a>>,
}

impl OutputFormatter for JsonOutput {
    fn render(&self, store: &Store, preview: usize, writer: &mut dyn Write) -> Result<()> {
        let relations = store
            .names()
            .filter_map(|name| {
                let schema = store.schema(name)?;
                let relation = store.relation(name)?;
                let rows = relation.rows();
                Some(JsonRelation {
                    name,
                    fields: schema.fields(),
                    rows: rows.len(),
                    preview: (preview > 0).then(|| &rows[..preview.min(rows.len())]),
                })
            })
            .collect();

        let output = JsonStoreOutput { relations };
        if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, &output)?;
        } else {
            serde_json::to_writer(&mut *writer, &output)?;
        }
        writeln!(writer)?;
        Ok(())
    }
}

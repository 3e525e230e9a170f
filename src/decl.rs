//! Declarations handed to the expression evaluator
//!
//! The evaluator resolves names against a [`Declarations`] set: loaded
//! relations with their types, and the built-in functions it implements.
//! Only the function signatures live here; their bodies belong to the
//! evaluator.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::model::{Relation, ScalarKind, Schema};

/// Type of a declared name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Scalar(ScalarKind),
    /// A single record
    Object(Schema),
    /// A collection of records
    List(Schema),
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fields = |schema: &Schema| {
            schema
                .fields()
                .iter()
                .map(|field| format!("{}: {}", field.name, field.kind))
                .collect::<Vec<_>>()
                .join(", ")
        };
        match self {
            Type::Scalar(kind) => write!(f, "{}", kind),
            Type::Object(schema) => write!(f, "{{{}}}", fields(schema)),
            Type::List(schema) => write!(f, "[{{{}}}]", fields(schema)),
        }
    }
}

/// A relation visible to the evaluator
#[derive(Debug, Clone)]
pub struct RelationDecl {
    pub rows: Arc<Relation>,
    pub ty: Type,
}

/// Signature of a built-in function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncDecl {
    pub name: &'static str,
    pub params: Vec<ScalarKind>,
    pub result: ScalarKind,
}

/// Built-in functions every declaration set carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    /// `trunc(number) -> number`
    Trunc,
    /// `dist(lat1, lon1, lat2, lon2) -> number`
    Dist,
    /// `trim(string) -> string`
    Trim,
    /// `lower(string) -> string`
    Lower,
    /// `upper(string) -> string`
    Upper,
    /// `fuzzy(string, string) -> number`
    Fuzzy,
}

impl Builtin {
    pub const ALL: [Builtin; 6] = [
        Builtin::Trunc,
        Builtin::Dist,
        Builtin::Trim,
        Builtin::Lower,
        Builtin::Upper,
        Builtin::Fuzzy,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Trunc => "trunc",
            Builtin::Dist => "dist",
            Builtin::Trim => "trim",
            Builtin::Lower => "lower",
            Builtin::Upper => "upper",
            Builtin::Fuzzy => "fuzzy",
        }
    }

    pub fn decl(self) -> FuncDecl {
        use ScalarKind as K;

        let (params, result) = match self {
            Builtin::Trunc => (vec![K::Number], K::Number),
            Builtin::Dist => (vec![K::Number; 4], K::Number),
            Builtin::Trim | Builtin::Lower | Builtin::Upper => (vec![K::String], K::String),
            Builtin::Fuzzy => (vec![K::String, K::String], K::Number),
        };
        FuncDecl {
            name: self.name(),
            params,
            result,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.name() == name)
    }
}

/// Match counters reported by fuzzy matching
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub total: i64,
    pub found: i64,
}

impl Stats {
    /// Sentinel for a match that could not be computed
    pub const FAILED: Stats = Stats {
        total: -1,
        found: -1,
    };

    pub fn is_failed(&self) -> bool {
        *self == Self::FAILED
    }
}

/// Names and types the evaluator can resolve
#[derive(Debug, Clone, Default)]
pub struct Declarations {
    relations: IndexMap<String, RelationDecl>,
    funcs: IndexMap<&'static str, FuncDecl>,
}

impl Declarations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a relation, replacing any earlier declaration of `name`
    pub fn declare(&mut self, name: impl Into<String>, rows: Arc<Relation>, ty: Type) {
        self.relations.insert(name.into(), RelationDecl { rows, ty });
    }

    /// Register a function signature, replacing any earlier one of the same name
    pub fn add_func(&mut self, func: FuncDecl) {
        self.funcs.insert(func.name, func);
    }

    pub fn relation(&self, name: &str) -> Option<&RelationDecl> {
        self.relations.get(name)
    }

    pub fn func(&self, name: &str) -> Option<&FuncDecl> {
        self.funcs.get(name)
    }

    pub fn relations(&self) -> impl Iterator<Item = (&str, &RelationDecl)> {
        self.relations.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn funcs(&self) -> impl Iterator<Item = &FuncDecl> {
        self.funcs.values()
    }

    /// Check whether `name` resolves to a relation or a function
    pub fn is_declared(&self, name: &str) -> bool {
        self.relations.contains_key(name) || self.funcs.contains_key(name)
    }
}

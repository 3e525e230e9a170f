//! Identifiers, field metadata and relation schemas

use serde::{Deserialize, Serialize};

/// Check whether `s` is a valid identifier.
///
/// Identifiers are non-empty runs of ASCII word characters (letters, digits,
/// underscore), i.e. `^\w+$`, with one further rule: the first character is
/// not a digit, so an expression can never mistake one for a number literal.
/// `2bad` and `2024` are rejected even though they match `\w+`.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Declared kind of a scalar slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    /// Placeholder given to every header field; cell values are typed individually
    #[default]
    Any,
    Number,
    String,
}

impl std::fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScalarKind::Any => write!(f, "any"),
            ScalarKind::Number => write!(f, "number"),
            ScalarKind::String => write!(f, "string"),
        }
    }
}

/// A named column of a schema
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    /// Column name (from header)
    pub name: String,
    /// Declared kind
    pub kind: ScalarKind,
}

impl Field {
    /// Create a field with the placeholder kind
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ScalarKind::Any,
        }
    }

    /// Create a field with a specified kind
    pub fn with_kind(name: impl Into<String>, kind: ScalarKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Ordered column list of a relation. Arity is fixed once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Get column index by name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Column names in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }
}

impl FromIterator<Field> for Schema {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

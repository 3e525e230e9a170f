//! Data model for loaded relations

mod relation;
mod schema;
mod value;

pub use relation::{Relation, Row};
pub use schema::{is_identifier, Field, ScalarKind, Schema};
pub use value::Value;

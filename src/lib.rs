//! tabstore - In-memory store of relations loaded from tab-delimited files
//!
//! Each file becomes a named relation: a schema read from its header line and
//! the rows parsed, concurrently, from the remaining lines. The store then
//! exposes everything it holds, together with the built-in function catalog,
//! as a [`Declarations`] set for an expression evaluator.

pub mod config;
pub mod decl;
pub mod error;
pub mod ingest;
pub mod model;
pub mod output;
pub mod store;

pub use config::Config;
pub use decl::Declarations;
pub use error::{Error, Result};
pub use model::{Relation, Row, Schema, Value};
pub use store::{LoadReport, Store};

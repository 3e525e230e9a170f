//! Ingestion of tab-delimited files
//!
//! The first line of a file is its header: tab-separated field identifiers.
//! Every following line is a record. There is no quoting or escaping, so a
//! value can contain neither a tab nor a newline.

mod header;
mod parse;
mod pipeline;

use std::path::Path;

use crate::config::Config;
use crate::error::Result;
use crate::model::{Relation, Schema};

pub use header::read_header;
pub use parse::{parse_line, strip_terminator, Fit, Line};
pub use pipeline::{read_body, LoadStats};

/// Read a complete file: its schema, its rows and the load counters
pub fn load_file(path: &Path, config: &Config) -> Result<(Schema, Relation, LoadStats)> {
    let schema = read_header(path)?;
    let (relation, stats) = read_body(path, &schema, config)?;
    Ok((schema, relation, stats))
}

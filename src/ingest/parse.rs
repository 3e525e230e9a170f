//! Line splitting, arity reconciliation and cell classification

use crate::model::{Row, Value};

/// A raw data line on its way to the parser workers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Position in the file; the header is line 0
    pub line_no: usize,
    /// Text including its line terminator, if any
    pub text: String,
}

/// How a line's field count was fitted to the schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fit {
    Exact,
    /// Trailing fields were dropped
    Truncated(usize),
    /// Empty strings were appended
    Padded(usize),
}

/// Strip a trailing `\n` (and the `\r` of a `\r\n` pair)
pub fn strip_terminator(text: &str) -> &str {
    match text.strip_suffix('\n') {
        Some(rest) => rest.strip_suffix('\r').unwrap_or(rest),
        None => text,
    }
}

/// Parse one data line into a row of exactly `arity` values.
pub fn parse_line(text: &str, arity: usize) -> (Row, Fit) {
    let mut fields: Vec<&str> = strip_terminator(text).split('\t').collect();

    let fit = if fields.len() > arity {
        let dropped = fields.len() - arity;
        fields.truncate(arity);
        Fit::Truncated(dropped)
    } else if fields.len() < arity {
        let missing = arity - fields.len();
        fields.resize(arity, "");
        Fit::Padded(missing)
    } else {
        Fit::Exact
    };

    let cells = fields.into_iter().map(Value::classify).collect();
    (Row::new(cells), fit)
}

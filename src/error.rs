//! Error types for loading relations

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure of a single file load. Nothing is stored when one is returned.
///
/// Row-level anomalies (field count mismatches, text that does not parse as
/// a finite number) are recovered inside the loader and never surface here.
#[derive(Error, Debug)]
pub enum Error {
    /// The relation name derived from the file name is not an identifier
    #[error(
        "invalid file name: '{name}' cannot be used as an identifier \
         (word characters only, not starting with a digit; ignoring)"
    )]
    InvalidName { name: String },

    /// The file could not be opened or read
    #[error("failed to load {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A header field is not an identifier
    #[error("failed to load {}: invalid field name: '{field}'", path.display())]
    InvalidFieldName { path: PathBuf, field: String },

    /// A pipeline thread panicked before finishing
    #[error("failed to load {}: loader thread panicked", path.display())]
    Worker { path: PathBuf },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

//! Header line reader

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::{is_identifier, Field, Schema};

/// Read the first line of `path` and build the relation schema from it.
///
/// Every field gets the placeholder kind; cell values are classified later,
/// one by one.
pub fn read_header(path: &Path) -> Result<Schema> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut reader = BufReader::new(file);

    let mut line = String::new();
    let read = reader.read_line(&mut line).map_err(|e| Error::io(path, e))?;
    if read == 0 {
        return Err(Error::io(
            path,
            io::Error::new(io::ErrorKind::UnexpectedEof, "missing header line"),
        ));
    }

    parse_header(&line).map_err(|field| Error::InvalidFieldName {
        path: path.to_path_buf(),
        field,
    })
}

/// Split a raw header line into fields, returning the first invalid name on failure
fn parse_header(line: &str) -> std::result::Result<Schema, String> {
    line.split('\t')
        .map(|raw| {
            let name = raw.trim_matches(&[' ', '\r', '\n'][..]);
            if is_identifier(name) {
                Ok(Field::new(name))
            } else {
                Err(name.to_string())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;
    use crate::model::ScalarKind;

    fn write_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_header() {
        let schema = parse_header("id\tamount\r\n").unwrap();
        assert_eq!(schema.names().collect::<Vec<_>>(), vec!["id", "amount"]);
        assert!(schema.fields().iter().all(|f| f.kind == ScalarKind::Any));
    }

    #[test]
    fn test_parse_header_trims_spaces() {
        let schema = parse_header(" id \t name\n").unwrap();
        assert_eq!(schema.names().collect::<Vec<_>>(), vec!["id", "name"]);
    }

    #[test]
    fn test_parse_header_rejects_bad_field() {
        assert_eq!(parse_header("id\t2bad x\n"), Err("2bad x".to_string()));
        assert_eq!(parse_header("a\t\tb\n"), Err(String::new()));
    }

    #[test]
    fn test_read_header_without_newline() {
        let file = write_file("a\tb\tc");
        let schema = read_header(file.path()).unwrap();
        assert_eq!(schema.len(), 3);
    }

    #[test]
    fn test_read_header_invalid_field() {
        let file = write_file("id\tbad-name\n1\t2\n");
        match read_header(file.path()) {
            Err(Error::InvalidFieldName { field, .. }) => assert_eq!(field, "bad-name"),
            other => panic!("expected InvalidFieldName, got {:?}", other),
        }
    }

    #[test]
    fn test_read_header_empty_file() {
        let file = write_file("");
        assert!(matches!(read_header(file.path()), Err(Error::Io { .. })));
    }

    #[test]
    fn test_read_header_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_header(&dir.path().join("absent.tsv"));
        assert!(matches!(result, Err(Error::Io { .. })));
    }
}

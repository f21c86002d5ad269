//! Record files.
//!
//! Accepts either a JSON array of records or JSON Lines (one record per line,
//! blank lines ignored). Every record must carry an `_id`.

use crate::model::error::SourceError;
use crate::model::Record;
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;

/// Load records from `path`.
///
/// # Errors
///
/// Returns `SourceError::FileNotFound` if the file does not exist,
/// `SourceError::Read` for other I/O errors and
/// `SourceError::InvalidRecord` for the first record that fails to decode.
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<Record>, SourceError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => SourceError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => SourceError::Read {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let records = parse_records(&content).map_err(|(line, message)| SourceError::InvalidRecord {
        path: path.to_path_buf(),
        line,
        message,
    })?;

    debug!(path = %path.display(), count = records.len(), "Loaded records");
    Ok(records)
}

/// Parse a JSON array or JSON Lines document.
///
/// On failure returns the line number of the offending record and the
/// decoder message.
pub fn parse_records(content: &str) -> Result<Vec<Record>, (usize, String)> {
    if content.trim_start().starts_with('[') {
        return serde_json::from_str(content).map_err(|err| (err.line(), err.to_string()));
    }

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line).map_err(|err| (index + 1, err.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RecordId;
    use std::env;

    #[test]
    fn parses_json_array() {
        let records = parse_records(r#"[{"_id": 1, "name": "a"}, {"_id": "x"}]"#).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].id(), &RecordId::from("x"));
    }

    #[test]
    fn parses_json_lines_skipping_blank_lines() {
        let content = "{\"_id\": 1}\n\n   \n{\"_id\": 2}\n";
        let records = parse_records(content).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn empty_document_is_no_records() {
        assert!(parse_records("").unwrap().is_empty());
    }

    #[test]
    fn json_lines_error_reports_one_based_line() {
        let content = "{\"_id\": 1}\n{\"name\": \"no id\"}\n";
        let (line, message) = parse_records(content).unwrap_err();
        assert_eq!(line, 2);
        assert!(message.contains("_id"));
    }

    #[test]
    fn missing_file_is_file_not_found() {
        let path = env::temp_dir().join("pagesel_test_missing_records.json");
        let _ = fs::remove_file(&path);
        assert!(matches!(
            load_records(&path),
            Err(SourceError::FileNotFound { .. })
        ));
    }

    #[test]
    fn load_records_reads_file_from_disk() {
        let path = env::temp_dir().join("pagesel_test_load_records.jsonl");
        fs::write(&path, "{\"_id\": 5, \"name\": \"Lobby\"}\n").unwrap();

        let records = load_records(&path).unwrap();
        assert_eq!(records[0].field_text("name"), "Lobby");

        fs::remove_file(&path).ok();
    }

    #[test]
    fn invalid_record_error_names_the_file() {
        let path = env::temp_dir().join("pagesel_test_invalid_records.jsonl");
        fs::write(&path, "not json\n").unwrap();

        let err = load_records(&path).unwrap_err();
        assert!(matches!(err, SourceError::InvalidRecord { line: 1, .. }));
        assert!(err.to_string().contains("pagesel_test_invalid_records.jsonl"));

        fs::remove_file(&path).ok();
    }
}

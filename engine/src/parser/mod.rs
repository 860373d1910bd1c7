//! CSV reading for tenant inputs.
//!
//! The whole file is read into memory: the first record is the header,
//! every following record is a row of text values. No type inference.

use csv::{ReaderBuilder, StringRecord};
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::CsvError;

/// A parsed CSV file.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvTable {
    /// Column names, verbatim from the header
    pub headers: Vec<String>,
    /// Data rows, each with exactly `headers.len()` values
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Read a CSV file from disk.
pub fn read_csv_file(path: &Path) -> Result<CsvTable, CsvError> {
    let file = std::fs::File::open(path).map_err(|source| CsvError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    read_csv(file, path)
}

/// Read CSV from any reader. `path` is only used in error messages.
pub fn read_csv<R: Read>(reader: R, path: &Path) -> Result<CsvTable, CsvError> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| to_csv_error(e, path))?
        .iter()
        .map(str::to_string)
        .collect();

    if headers.is_empty() {
        return Err(CsvError::EmptyFile(path.to_path_buf()));
    }

    let mut rows = Vec::new();
    let mut record = StringRecord::new();
    while reader
        .read_record(&mut record)
        .map_err(|e| to_csv_error(e, path))?
    {
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(CsvTable { headers, rows })
}

fn to_csv_error(err: csv::Error, path: &Path) -> CsvError {
    let line = err.position().map(|p| p.line()).unwrap_or(0);
    match err.into_kind() {
        csv::ErrorKind::Io(source) => CsvError::Read {
            path: PathBuf::from(path),
            source,
        },
        csv::ErrorKind::UnequalLengths {
            expected_len, len, ..
        } => CsvError::Parse {
            path: PathBuf::from(path),
            line,
            message: format!("expected {} fields, found {}", expected_len, len),
        },
        other => CsvError::Parse {
            path: PathBuf::from(path),
            line,
            message: format!("{:?}", other),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn parse(content: &str) -> Result<CsvTable, CsvError> {
        read_csv(content.as_bytes(), Path::new("test.csv"))
    }

    #[test]
    fn test_simple_csv() {
        let table = parse("id,amount\n1,10\n2,20\n").unwrap();

        assert_eq!(table.headers, vec!["id", "amount"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows[0], vec!["1", "10"]);
        assert_eq!(table.rows[1], vec!["2", "20"]);
    }

    #[test]
    fn test_header_only() {
        let table = parse("id,amount\n").unwrap();
        assert_eq!(table.headers.len(), 2);
        assert!(table.rows.is_empty());
    }

    #[test]
    fn test_quoted_values() {
        let table = parse("name,note\n\"Smith, Jane\",\"said \"\"hi\"\"\"\n").unwrap();
        assert_eq!(table.rows[0], vec!["Smith, Jane", "said \"hi\""]);
    }

    #[test]
    fn test_values_kept_verbatim() {
        let table = parse("a,b\n 007 ,\n").unwrap();
        assert_eq!(table.rows[0], vec![" 007 ", ""]);
    }

    #[test]
    fn test_empty_csv_error() {
        let err = parse("").unwrap_err();
        assert!(matches!(err, CsvError::EmptyFile(_)));
    }

    #[test]
    fn test_ragged_row_reports_line() {
        let err = parse("a,b\n1,2\n3\n").unwrap_err();
        match err {
            CsvError::Parse { line, message, .. } => {
                assert_eq!(line, 3);
                assert!(message.contains("expected 2 fields"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let err = read_csv_file(&dir.path().join("missing.csv")).unwrap_err();
        assert!(matches!(err, CsvError::Read { .. }));
    }
}

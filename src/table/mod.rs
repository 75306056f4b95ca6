//! In-memory CSV tables
//!
//! A [`Table`] holds the header row and all data rows as strings, in file
//! order. Transforms mutate the table in place; file I/O stays at the
//! edges, so everything above this module can be tested without disk.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Origin label used for tables that were never loaded from a file.
const IN_MEMORY: &str = "(in-memory)";

/// Errors raised by table loading, writing and schema validation
#[derive(Error, Debug)]
pub enum TableError {
    /// A required column is absent from the header row.
    #[error("{table}: required column '{column}' not found")]
    MissingColumn { table: String, column: String },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl TableError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        TableError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn csv(path: &Path, source: csv::Error) -> Self {
        TableError::Csv {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type TableResult<T> = Result<T, TableError>;

/// A loaded CSV table: ordered headers plus string rows
///
/// Rows are kept exactly as read; missing trailing cells read back as
/// empty strings through [`Table::cell`].
#[derive(Debug, Clone, Default)]
pub struct Table {
    /// Column names, in file order
    pub headers: Vec<String>,

    /// Data rows, each cell as a string
    pub rows: Vec<Vec<String>>,

    /// Where the table came from, for error messages
    origin: String,
}

impl Table {
    /// Create an empty in-memory table with the given headers
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Table {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            origin: IN_MEMORY.to_string(),
        }
    }

    /// Append a data row
    pub fn push_row<I, S>(&mut self, row: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    /// Load a table from a CSV file, treating the first line as headers
    pub fn from_csv_path(path: impl AsRef<Path>) -> TableResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| TableError::io(path, e))?;
        let mut reader = csv::Reader::from_reader(file);

        let headers = reader
            .headers()
            .map_err(|e| TableError::csv(path, e))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| TableError::csv(path, e))?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Table {
            headers,
            rows,
            origin: path.display().to_string(),
        })
    }

    /// Write the table to a CSV file
    pub fn to_csv_path(&self, path: impl AsRef<Path>) -> TableResult<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| TableError::io(path, e))?;
        let mut writer = csv::Writer::from_writer(file);

        writer
            .write_record(&self.headers)
            .map_err(|e| TableError::csv(path, e))?;
        for row in &self.rows {
            writer
                .write_record(row)
                .map_err(|e| TableError::csv(path, e))?;
        }
        writer.flush().map_err(|e| TableError::io(path, e))?;
        Ok(())
    }

    /// Index of a column by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Index of a column that must exist
    pub fn require_column(&self, name: &str) -> TableResult<usize> {
        self.column_index(name)
            .ok_or_else(|| TableError::MissingColumn {
                table: self.origin.clone(),
                column: name.to_string(),
            })
    }

    /// Validate that every named column exists
    pub fn require_columns(&self, names: &[&str]) -> TableResult<()> {
        for name in names {
            self.require_column(name)?;
        }
        Ok(())
    }

    /// Cell content, empty string for short rows
    pub fn cell<'a>(&self, row: &'a [String], column: usize) -> &'a str {
        row.get(column).map(String::as_str).unwrap_or("")
    }

    /// Number of data rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Origin label used in error messages
    pub fn origin(&self) -> &str {
        &self.origin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_new_table() {
        let mut table = Table::new(["a", "b"]);
        table.push_row(["1", "2"]);
        table.push_row(["3", "4"]);

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_index("b"), Some(1));
        assert_eq!(table.column_index("z"), None);
        assert_eq!(table.origin(), "(in-memory)");
    }

    #[test]
    fn test_require_column_missing() {
        let table = Table::new(["a"]);
        let err = table.require_column("name").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("name"), "unexpected message: {message}");
        assert!(matches!(err, TableError::MissingColumn { .. }));
    }

    #[test]
    fn test_cell_pads_short_rows() {
        let mut table = Table::new(["a", "b", "c"]);
        table.push_row(["1"]);
        assert_eq!(table.cell(&table.rows[0], 0), "1");
        assert_eq!(table.cell(&table.rows[0], 2), "");
    }

    #[test]
    fn test_csv_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("table.csv");

        let mut table = Table::new(["name", "tax_id"]);
        table.push_row(["Acme, Ltd.", "191"]);
        table.push_row(["Bolt", "272"]);
        table.to_csv_path(&path).unwrap();

        let loaded = Table::from_csv_path(&path).unwrap();
        assert_eq!(loaded.headers, vec!["name", "tax_id"]);
        assert_eq!(loaded.rows.len(), 2);
        // Quoting of the embedded comma survives the round trip
        assert_eq!(loaded.rows[0][0], "Acme, Ltd.");
        assert_eq!(loaded.origin(), path.display().to_string());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Table::from_csv_path("definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, TableError::Io { .. }));
    }
}

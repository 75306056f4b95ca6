//! Data-cleaning transforms over CSV tables
//!
//! Each transform has a pure in-place form operating on a [`Table`] and a
//! `*_file` wrapper that reads a CSV, applies the transform and writes the
//! result. A transform that fails validation never writes its output file.

use crate::table::{Table, TableResult};
use rustc_hash::FxHashSet;
use std::path::Path;
use tracing::info;

/// Number of digits in a full tax id (CNPJ)
const TAX_ID_DIGITS: usize = 14;

/// Format a raw tax id as `DD.DDD.DDD/DDDD-DD`.
///
/// Non-digit characters are discarded and the digit string is left-padded
/// with zeros to 14 digits, so short registry extracts and already
/// formatted values both normalize to the same output.
pub fn format_tax_id(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    let padded = format!("{digits:0>width$}", width = TAX_ID_DIGITS);
    format!(
        "{}.{}.{}/{}-{}",
        &padded[..2],
        &padded[2..5],
        &padded[5..8],
        &padded[8..12],
        &padded[12..]
    )
}

/// Format every value of a tax-id column in place
pub fn format_tax_id_column(table: &mut Table, column: &str) -> TableResult<()> {
    let idx = table.require_column(column)?;
    for row in table.rows.iter_mut() {
        if let Some(cell) = row.get_mut(idx) {
            *cell = format_tax_id(cell);
        }
    }
    Ok(())
}

/// Upper-case every value of the named column in place
pub fn uppercase_column(table: &mut Table, column: &str) -> TableResult<()> {
    let idx = table.require_column(column)?;
    for row in table.rows.iter_mut() {
        if let Some(cell) = row.get_mut(idx) {
            *cell = cell.to_uppercase();
        }
    }
    Ok(())
}

/// Remove the named columns where present; absent names are ignored
pub fn drop_columns<S: AsRef<str>>(table: &mut Table, columns: &[S]) {
    let mut indices: Vec<usize> = columns
        .iter()
        .filter_map(|c| table.column_index(c.as_ref()))
        .collect();
    indices.sort_unstable();
    indices.dedup();

    // Remove right-to-left so earlier indices stay valid
    for &idx in indices.iter().rev() {
        table.headers.remove(idx);
        for row in table.rows.iter_mut() {
            if idx < row.len() {
                row.remove(idx);
            }
        }
    }
}

/// Keep the first row per key-column value
pub fn dedup_by_column(table: &mut Table, column: &str) -> TableResult<()> {
    let idx = table.require_column(column)?;
    let mut seen = FxHashSet::default();
    table
        .rows
        .retain(|row| seen.insert(row.get(idx).cloned().unwrap_or_default()));
    Ok(())
}

/// Read `input`, format its tax-id column, write `output`
pub fn format_tax_id_file(input: &Path, output: &Path, column: &str) -> TableResult<()> {
    let mut table = Table::from_csv_path(input)?;
    format_tax_id_column(&mut table, column)?;
    table.to_csv_path(output)?;
    info!(output = %output.display(), rows = table.row_count(), "tax ids formatted");
    Ok(())
}

/// Read `input`, upper-case the named column, write `output`
pub fn uppercase_file(input: &Path, output: &Path, column: &str) -> TableResult<()> {
    let mut table = Table::from_csv_path(input)?;
    uppercase_column(&mut table, column)?;
    table.to_csv_path(output)?;
    info!(output = %output.display(), column, "column upper-cased");
    Ok(())
}

/// Read `input`, drop the named columns, write `output`
pub fn drop_columns_file<S: AsRef<str>>(
    input: &Path,
    output: &Path,
    columns: &[S],
) -> TableResult<()> {
    let mut table = Table::from_csv_path(input)?;
    drop_columns(&mut table, columns);
    table.to_csv_path(output)?;
    info!(output = %output.display(), remaining = table.headers.len(), "columns removed");
    Ok(())
}

/// Read `input`, keep the first row per key, write `output`
pub fn dedup_file(input: &Path, output: &Path, column: &str) -> TableResult<()> {
    let mut table = Table::from_csv_path(input)?;
    let before = table.row_count();
    dedup_by_column(&mut table, column)?;
    table.to_csv_path(output)?;
    info!(
        output = %output.display(),
        removed = before - table.row_count(),
        "duplicates removed"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TableError;

    #[test]
    fn test_format_tax_id_pads_and_groups() {
        assert_eq!(format_tax_id("19131243000197"), "19.131.243/0001-97");
        assert_eq!(format_tax_id("191"), "00.000.000/0001-91");
        assert_eq!(format_tax_id(""), "00.000.000/0000-00");
    }

    #[test]
    fn test_format_tax_id_is_idempotent() {
        let once = format_tax_id("9512468000160");
        assert_eq!(format_tax_id(&once), once);
    }

    #[test]
    fn test_format_tax_id_digit_shape() {
        for raw in ["7", "123456", "19131243000197"] {
            let formatted = format_tax_id(raw);
            let groups: Vec<&str> = formatted
                .split(|c| c == '.' || c == '/' || c == '-')
                .collect();
            let lengths: Vec<usize> = groups.iter().map(|g| g.len()).collect();
            assert_eq!(lengths, vec![2, 3, 3, 4, 2], "bad shape for {raw}");
            assert!(groups.iter().all(|g| g.chars().all(|c| c.is_ascii_digit())));
        }
    }

    #[test]
    fn test_uppercase_column() {
        let mut table = Table::new(["name", "city"]);
        table.push_row(["acme supplies", "Recife"]);
        uppercase_column(&mut table, "name").unwrap();

        assert_eq!(table.rows[0][0], "ACME SUPPLIES");
        // Other columns untouched
        assert_eq!(table.rows[0][1], "Recife");
    }

    #[test]
    fn test_uppercase_missing_column_is_schema_error() {
        let mut table = Table::new(["city"]);
        let err = uppercase_column(&mut table, "name").unwrap_err();
        assert!(matches!(err, TableError::MissingColumn { .. }));
    }

    #[test]
    fn test_drop_columns_ignores_absent() {
        let mut table = Table::new(["a", "b", "c"]);
        table.push_row(["1", "2", "3"]);
        drop_columns(&mut table, &["c", "zzz", "a"]);

        assert_eq!(table.headers, vec!["b"]);
        assert_eq!(table.rows[0], vec!["2"]);
    }

    #[test]
    fn test_dedup_keeps_first_and_is_idempotent() {
        let mut table = Table::new(["name", "value"]);
        table.push_row(["X", "1"]);
        table.push_row(["Y", "2"]);
        table.push_row(["X", "3"]);

        dedup_by_column(&mut table, "name").unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows[0], vec!["X", "1"]);

        let snapshot = table.rows.clone();
        dedup_by_column(&mut table, "name").unwrap();
        assert_eq!(table.rows, snapshot);
    }
}

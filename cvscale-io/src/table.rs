use std::fmt::Display;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;

use crate::csv;
use crate::error::TableError;

/// An in-memory CSV table: one header row plus string cells.
///
/// # Purpose
/// Holds the source table untouched so derived columns can be appended and
/// written back with every original column (and its original text) intact.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self { headers, rows: Vec::new() }
    }

    /// Parses CSV text. The first record is the header.
    ///
    /// # Errors
    /// `MissingHeader` for empty input, `RaggedRow` if any row's width differs
    /// from the header's, `UnterminatedQuote` for malformed quoting.
    pub fn from_csv_str(text: &str) -> Result<Self, TableError> {
        let mut records = csv::parse(text)?.into_iter();
        let headers = records.next().ok_or(TableError::MissingHeader)?;

        let mut rows = Vec::new();
        for (i, record) in records.enumerate() {
            if record.len() != headers.len() {
                return Err(TableError::RaggedRow {
                    row: i + 1,
                    expected: headers.len(),
                    got: record.len(),
                });
            }
            rows.push(record);
        }
        Ok(Self { headers, rows })
    }

    pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| TableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_csv_str(&text)?;
        info!("Loaded {} rows x {} columns from {}", table.row_count(), table.headers.len(), path.display());
        Ok(table)
    }

    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), TableError> {
        let path = path.as_ref();
        let io_err = |source| TableError::Io { path: path.to_path_buf(), source };

        let file = File::create(path).map_err(io_err)?;
        let mut out = BufWriter::new(file);
        self.write_to(&mut out).map_err(io_err)?;
        out.flush().map_err(io_err)?;

        info!("Wrote {} rows x {} columns to {}", self.row_count(), self.headers.len(), path.display());
        Ok(())
    }

    pub fn to_csv_string(&self) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.write_to(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn write_to<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        csv::write_record(out, &self.headers)?;
        for row in &self.rows {
            csv::write_record(out, row)?;
        }
        Ok(())
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| r[idx].as_str())
    }

    /// Header lookup, tolerant of surrounding whitespace on either side.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .or_else(|| self.headers.iter().position(|h| h.trim() == name.trim()))
    }

    /// Parses a column as `f64`.
    ///
    /// # Errors
    /// `MissingColumn` if no header matches, `ParseValue` on the first cell that
    /// is not a number (empty cells included).
    pub fn column_f64(&self, name: &str) -> Result<Vec<f64>, TableError> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))?;

        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let raw = row[idx].trim();
                raw.parse::<f64>().map_err(|_| TableError::ParseValue {
                    column: self.headers[idx].clone(),
                    row: i + 1,
                    value: raw.to_string(),
                })
            })
            .collect()
    }

    /// Replaces the column called `name`, or appends it if absent.
    ///
    /// # Errors
    /// `LengthMismatch` if `values.len() != row_count()`.
    pub fn set_column<T: Display>(&mut self, name: &str, values: &[T]) -> Result<(), TableError> {
        if values.len() != self.rows.len() {
            return Err(TableError::LengthMismatch {
                column: name.to_string(),
                expected: self.rows.len(),
                got: values.len(),
            });
        }

        let rendered = values.iter().map(|v| v.to_string());
        match self.column_index(name) {
            Some(idx) => {
                for (row, cell) in self.rows.iter_mut().zip(rendered) {
                    row[idx] = cell;
                }
            }
            None => {
                self.headers.push(name.to_string());
                for (row, cell) in self.rows.iter_mut().zip(rendered) {
                    row.push(cell);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Date,FL US Equity\n2020-01-03,40.5\n2020-01-10,\"38.25\"\n2020-01-17, 41 \n";

    #[test]
    fn test_column_f64() {
        let table = Table::from_csv_str(SAMPLE).unwrap();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_f64("FL US Equity").unwrap(), vec![40.5, 38.25, 41.0]);
        assert_eq!(table.column_f64(" FL US Equity ").unwrap().len(), 3);
    }

    #[test]
    fn test_missing_and_bad_columns() {
        let table = Table::from_csv_str(SAMPLE).unwrap();
        assert!(matches!(table.column_f64("Close"), Err(TableError::MissingColumn(c)) if c == "Close"));
        assert!(matches!(
            table.column_f64("Date"),
            Err(TableError::ParseValue { row: 1, ref value, .. }) if value == "2020-01-03"
        ));
    }

    #[test]
    fn test_ragged_and_empty_input() {
        assert!(matches!(
            Table::from_csv_str("a,b\n1,2\n3\n"),
            Err(TableError::RaggedRow { row: 2, expected: 2, got: 1 })
        ));
        assert!(matches!(Table::from_csv_str(""), Err(TableError::MissingHeader)));
    }

    #[test]
    fn test_set_column_appends_then_replaces() {
        let mut table = Table::from_csv_str(SAMPLE).unwrap();
        table.set_column("Scaled", &[1, 2, 3]).unwrap();
        assert_eq!(table.headers().last().map(String::as_str), Some("Scaled"));
        table.set_column("Scaled", &[7, 8, 9]).unwrap();
        assert_eq!(table.headers().len(), 3);
        assert_eq!(table.cell(2, "Scaled"), Some("9"));

        assert!(matches!(
            table.set_column("Short", &[1.0]),
            Err(TableError::LengthMismatch { expected: 3, got: 1, .. })
        ));
    }

    #[test]
    fn test_original_text_is_preserved() {
        let mut table = Table::from_csv_str(SAMPLE).unwrap();
        table.set_column("Int", &[6, 6, 6]).unwrap();
        let out = table.to_csv_string();
        assert!(out.starts_with("Date,FL US Equity,Int\n2020-01-03,40.5,6\n"));
        assert!(out.contains("2020-01-17,\" 41 \",6\n"));
    }
}

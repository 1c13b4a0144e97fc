// VIRTMEM: Paging Simulation and Page Fault Plotting
// Copyright (C) 2025 The virtmem authors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.
//! Column-wise view of a CSV file whose fields are all integers.
//!
//! The first row names the columns. Headers and fields are trimmed, so both `Frames,Faults` and
//! `Frames, Faults` (as written by the simulator) are accepted.

use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};

use csv::{ReaderBuilder, Trim};

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("Cannot read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Malformed CSV in {origin}: {source}")]
    Csv { origin: String, source: csv::Error },
    #[error("{origin}:{line}: column {column:?} holds {value:?}, which is not an integer")]
    NotAnInteger {
        origin: String,
        line: u64,
        column: String,
        value: String,
    },
    #[error("{origin}:{line}: expected {expected} fields but found {found}")]
    RowLength {
        origin: String,
        line: u64,
        expected: usize,
        found: usize,
    },
    #[error("{origin}: column {column:?} appears more than once in the header")]
    DuplicateColumn { origin: String, column: String },
}

/// Integer columns keyed by their (trimmed) header name.
///
/// Columns keep the order of the header row and values keep the order of the data rows. All
/// columns have the same length, namely the number of data rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnTable {
    columns: Vec<(String, Vec<i64>)>,
    rows: usize,
}

impl ColumnTable {
    /// Read the CSV file at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| TableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file, path.display().to_string())
    }

    /// Read CSV data from `reader`. `origin` names the source in error messages.
    pub fn from_reader<R: Read>(reader: R, origin: impl Into<String>) -> Result<Self, TableError> {
        let origin = origin.into();
        let csv_error = |source| TableError::Csv {
            origin: origin.clone(),
            source,
        };

        let mut csv = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut columns: Vec<(String, Vec<i64>)> = Vec::new();
        for name in csv.headers().map_err(csv_error)?.iter() {
            if columns.iter().any(|(existing, _)| existing == name) {
                return Err(TableError::DuplicateColumn {
                    origin: origin.clone(),
                    column: name.to_string(),
                });
            }
            columns.push((name.to_string(), Vec::new()));
        }

        let mut rows = 0;
        for record in csv.records() {
            let record = record.map_err(csv_error)?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();

            if record.len() != columns.len() {
                return Err(TableError::RowLength {
                    origin: origin.clone(),
                    line,
                    expected: columns.len(),
                    found: record.len(),
                });
            }

            for ((name, values), field) in columns.iter_mut().zip(record.iter()) {
                let value = field
                    .parse::<i64>()
                    .map_err(|_| TableError::NotAnInteger {
                        origin: origin.clone(),
                        line,
                        column: name.clone(),
                        value: field.to_string(),
                    })?;
                values.push(value);
            }
            rows += 1;
        }

        log::trace!("Parsed {rows} rows with {} columns from {origin}", columns.len());
        Ok(Self { columns, rows })
    }

    /// Values of the column called `name`, if present.
    pub fn get(&self, name: &str) -> Option<&[i64]> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, values)| values.as_slice())
    }

    /// Column names in header order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    /// Iterate over `(name, values)` in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[i64])> {
        self.columns
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }
}

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
//! CSV file collecting the counters of many simulation runs.

use std::{fs::OpenOptions, path::Path};

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ResultsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// One row of the results file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResultRecord {
    pub frames: u64,
    pub pages: u64,
    pub faults: u64,
    pub reads: u64,
    pub writes: u64,
}

/// Append `record` to the CSV file at `path`, see [`append_records`].
pub fn append_record(path: impl AsRef<Path>, record: &ResultRecord) -> Result<(), ResultsError> {
    append_records(path, [*record])
}

/// Append all `records` to the CSV file at `path`. The file is created if needed, and the header
/// is only written if the file is empty.
pub fn append_records(
    path: impl AsRef<Path>,
    records: impl IntoIterator<Item = ResultRecord>,
) -> Result<(), ResultsError> {
    let path = path.as_ref();
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let empty = file.metadata()?.len() == 0;

    let mut csv = csv::WriterBuilder::new()
        .has_headers(empty)
        .from_writer(file);
    let mut count = 0;
    for record in records {
        csv.serialize(record)?;
        count += 1;
    }
    csv.flush()?;

    log::debug!("Appended {count} records to {path:?}");
    Ok(())
}

/// Read all records of the CSV file at `path`.
pub fn read_records(path: impl AsRef<Path>) -> Result<Vec<ResultRecord>, ResultsError> {
    let mut csv = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;
    Ok(csv.deserialize().collect::<Result<_, _>>()?)
}

#[cfg(test)]
mod test {
    use super::*;

    fn record(frames: u64) -> ResultRecord {
        ResultRecord {
            frames,
            pages: 100,
            faults: 1000 / frames,
            reads: 500 / frames,
            writes: 250 / frames,
        }
    }

    #[test]
    fn header_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");

        append_record(&path, &record(10)).unwrap();
        append_record(&path, &record(20)).unwrap();
        append_records(&path, [record(25), record(50)]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "Frames,Pages,Faults,Reads,Writes\n\
             10,100,100,50,25\n\
             20,100,50,25,12\n\
             25,100,40,20,10\n\
             50,100,20,10,5\n"
        );
        assert_eq!(
            read_records(&path).unwrap(),
            vec![record(10), record(20), record(25), record(50)]
        );
    }

    #[test]
    fn reads_spaced_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        std::fs::write(&path, "Frames, Pages, Faults, Reads, Writes\n10, 100, 100, 50, 25\n")
            .unwrap();

        assert_eq!(read_records(&path).unwrap(), vec![record(10)]);
    }
}

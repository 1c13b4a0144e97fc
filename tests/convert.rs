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
//! End-to-end tests of the CSV to chart conversion with a renderer that only records its input.

use std::path::{Path, PathBuf};

use virtmem::{
    chart::{convert, ticks, ChartError, ChartOptions, ChartRequest, SchemaError},
    render::{RenderError, Renderer},
    results::{append_records, read_records},
    sim::{self, Policy, Program, SimConfig},
    table::TableError,
};

#[derive(Default)]
struct Recorder {
    calls: Vec<(ChartRequest, PathBuf)>,
}

impl Renderer for Recorder {
    fn render(&mut self, request: &ChartRequest, output: &Path) -> Result<(), RenderError> {
        self.calls.push((request.clone(), output.to_path_buf()));
        Ok(())
    }
}

struct Failing;

impl Renderer for Failing {
    fn render(&mut self, _: &ChartRequest, _: &Path) -> Result<(), RenderError> {
        Err(RenderError::Draw("no backend".to_string()))
    }
}

fn write_csv(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn series(request: &ChartRequest) -> Vec<(&str, &[i64])> {
    request
        .series
        .iter()
        .map(|s| (s.name.as_str(), s.values.as_slice()))
        .collect()
}

#[test]
fn classic_presentation() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_csv(
        dir.path(),
        "fifo.scan.csv",
        "Frames,Faults,Reads,Writes\n0,1,2,3\n5,2,3,1\n",
    );

    let mut recorder = Recorder::default();
    let conversion = convert(&input, &ChartOptions::classic(), &mut recorder).unwrap();

    assert_eq!(conversion.output, dir.path().join("fifo.png"));
    assert_eq!(conversion.table.get("Frames"), Some(&[0, 5][..]));

    assert_eq!(recorder.calls.len(), 1);
    let (request, output) = &recorder.calls[0];
    assert_eq!(output, &conversion.output);
    assert_eq!(request.frames, vec![0, 5]);
    assert_eq!(
        series(request),
        vec![
            ("Faults", &[1, 2][..]),
            ("Writes", &[3, 1][..]),
            ("Reads", &[2, 3][..]),
        ]
    );
    assert_eq!(request.ticks, (0..=100).step_by(5).collect::<Vec<i64>>());
    assert_eq!(request.title, None);
    assert!(!request.show_legend);
}

#[test]
fn titled_presentation() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_csv(
        dir.path(),
        "data.run1.csv",
        "Frames, Pages, Faults, Reads, Writes\n10, 100, 30, 20, 10\n20, 100, 15, 10, 5\n",
    );

    let mut recorder = Recorder::default();
    let conversion = convert(&input, &ChartOptions::titled("Random / focus"), &mut recorder).unwrap();

    assert_eq!(conversion.output, dir.path().join("data.png"));
    let (request, _) = &recorder.calls[0];
    assert_eq!(
        series(request),
        vec![
            ("Faults", &[30, 15][..]),
            ("Reads", &[20, 10][..]),
            ("Writes", &[10, 5][..]),
        ]
    );
    assert_eq!(request.ticks, vec![0, 20, 40, 60, 80, 100]);
    assert_eq!(request.title.as_deref(), Some("Random / focus"));
    assert_eq!(request.x_label.as_deref(), Some("Frames"));
    assert!(request.show_legend);
}

#[test]
fn missing_column_is_not_rendered() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_csv(dir.path(), "results.csv", "Frames,Faults,Writes\n3,10,4\n");

    let mut recorder = Recorder::default();
    let err = convert(&input, &ChartOptions::classic(), &mut recorder).unwrap_err();

    assert!(err.is_schema());
    assert!(matches!(
        &err,
        ChartError::Schema(SchemaError::MissingColumn(column)) if column == "Reads"
    ));
    assert!(err.to_string().contains("Reads"));
    assert!(recorder.calls.is_empty());
}

#[test]
fn malformed_field() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_csv(
        dir.path(),
        "results.csv",
        "Frames,Faults,Reads,Writes\n3,10,9,4\n4,8,abc,2\n",
    );

    let mut recorder = Recorder::default();
    let err = convert(&input, &ChartOptions::classic(), &mut recorder).unwrap_err();

    assert!(err.is_input());
    match &err {
        ChartError::Input(TableError::NotAnInteger {
            line,
            column,
            value,
            ..
        }) => {
            assert_eq!(*line, 3);
            assert_eq!(column, "Reads");
            assert_eq!(value, "abc");
        }
        e => panic!("unexpected error: {e}"),
    }
    assert!(recorder.calls.is_empty());
}

#[test]
fn missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = convert(
        dir.path().join("nothing.csv"),
        &ChartOptions::classic(),
        &mut Recorder::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ChartError::Input(TableError::Io { .. })));
}

#[test]
fn render_failure_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_csv(dir.path(), "results.csv", "Frames,Faults,Reads,Writes\n3,1,1,1\n");
    let err = convert(&input, &ChartOptions::classic(), &mut Failing).unwrap_err();
    assert!(matches!(err, ChartError::Render(_)));
    assert!(!err.is_schema());
}

#[test]
fn plot_simulated_sweep() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("results.csv");

    let reports: Vec<_> = (3..=8)
        .map(|frames| {
            sim::run(SimConfig::new(8, frames, Policy::Fifo, Program::Scan).with_page_size(32))
                .unwrap()
        })
        .collect();
    append_records(&input, reports.iter().map(|r| r.record())).unwrap();
    let records = read_records(&input).unwrap();
    assert_eq!(records.len(), reports.len());
    assert!(records.iter().all(|r| r.pages == 8));

    let mut recorder = Recorder::default();
    convert(&input, &ChartOptions::titled("FIFO / scan"), &mut recorder).unwrap();

    let (request, output) = &recorder.calls[0];
    assert_eq!(output, &dir.path().join("results.png"));
    assert_eq!(request.frames, vec![3, 4, 5, 6, 7, 8]);
    assert_eq!(request.ticks, ticks(20, 100));
    let faults = &request.series[0].values;
    let expected: Vec<i64> = reports.iter().map(|r| r.counters.faults as i64).collect();
    assert_eq!(faults, &expected);
    // with all pages in memory, nothing is ever written back
    assert_eq!(request.series[2].values.last(), Some(&0));
}

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
//! Conversion of a page fault CSV into a line chart.
//!
//! The x-axis holds the number of frames, and one series is drawn for each of the page faults, disk
//! reads and disk writes. Two presentations exist: [`ChartOptions::classic`] (dense ticks, no
//! labels) and [`ChartOptions::titled`] (sparse ticks, title, axis label and legend).

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::Serialize;

use crate::{
    render::{RenderError, Renderer},
    table::{ColumnTable, TableError},
};

pub const FRAMES: &str = "Frames";
pub const FAULTS: &str = "Faults";
pub const READS: &str = "Reads";
pub const WRITES: &str = "Writes";

/// Columns that must be present, in the order they are checked.
pub const REQUIRED_COLUMNS: [&str; 4] = [FRAMES, FAULTS, READS, WRITES];

/// Upper end of the x-axis, unless the data goes beyond it.
pub const DOMAIN_MAX: i64 = 100;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Required column {0:?} is missing")]
    MissingColumn(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    #[error(transparent)]
    Input(#[from] TableError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("Cannot derive an output file name from {0:?}")]
    OutputName(PathBuf),
}

impl ChartError {
    /// The file was read but does not have the expected columns.
    pub fn is_schema(&self) -> bool {
        matches!(
            self,
            Self::Schema(_) | Self::Input(TableError::DuplicateColumn { .. })
        )
    }

    /// The file could not be read or contains malformed data.
    pub fn is_input(&self) -> bool {
        matches!(self, Self::Input(_) | Self::OutputName(_)) && !self.is_schema()
    }
}

/// Order in which the three series are drawn (and hence which color each one gets).
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeriesOrder {
    /// Faults, Writes, Reads
    #[default]
    FaultsWritesReads,
    /// Faults, Reads, Writes
    FaultsReadsWrites,
}

impl SeriesOrder {
    pub fn columns(&self) -> [&'static str; 3] {
        match self {
            Self::FaultsWritesReads => [FAULTS, WRITES, READS],
            Self::FaultsReadsWrites => [FAULTS, READS, WRITES],
        }
    }
}

/// Presentation options for the chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartOptions {
    /// Distance between two x-axis ticks.
    pub tick_step: i64,
    pub show_legend: bool,
    pub title: Option<String>,
    pub x_label: Option<String>,
    pub order: SeriesOrder,
    /// Shrink the margins around the plotting area.
    pub tight_layout: bool,
}

impl ChartOptions {
    /// Ticks every 5 frames, no title, no legend.
    pub fn classic() -> Self {
        Self {
            tick_step: 5,
            show_legend: false,
            title: None,
            x_label: None,
            order: SeriesOrder::FaultsWritesReads,
            tight_layout: false,
        }
    }

    /// Ticks every 20 frames with the given title, an x-axis label and a legend.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            tick_step: 20,
            show_legend: true,
            title: Some(title.into()),
            x_label: Some(FRAMES.to_string()),
            order: SeriesOrder::FaultsReadsWrites,
            tight_layout: true,
        }
    }
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self::classic()
    }
}

/// One named line drawn against the frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Series {
    pub name: String,
    pub values: Vec<i64>,
}

/// Everything a [`Renderer`] needs to draw the chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartRequest {
    /// Shared x values.
    pub frames: Vec<i64>,
    pub series: Vec<Series>,
    /// Positions of the x-axis ticks.
    pub ticks: Vec<i64>,
    /// The x-axis spans `0..=x_max`.
    pub x_max: i64,
    pub title: Option<String>,
    pub x_label: Option<String>,
    pub show_legend: bool,
    pub tight_layout: bool,
}

impl ChartRequest {
    /// Validate that `table` holds all required columns and assemble the chart.
    pub fn from_table(table: &ColumnTable, options: &ChartOptions) -> Result<Self, SchemaError> {
        let column = |name: &str| {
            table
                .get(name)
                .ok_or_else(|| SchemaError::MissingColumn(name.to_string()))
        };
        for name in REQUIRED_COLUMNS {
            column(name)?;
        }

        let frames = column(FRAMES)?.to_vec();
        let series = options
            .order
            .columns()
            .into_iter()
            .map(|name| {
                Ok(Series {
                    name: name.to_string(),
                    values: column(name)?.to_vec(),
                })
            })
            .collect::<Result<Vec<_>, SchemaError>>()?;

        let step = options.tick_step.max(1);
        let x_max = domain_max(frames.iter().copied().max().unwrap_or_default(), step);

        Ok(Self {
            ticks: ticks(step, x_max),
            frames,
            series,
            x_max,
            title: options.title.clone(),
            x_label: options.x_label.clone(),
            show_legend: options.show_legend,
            tight_layout: options.tight_layout,
        })
    }

    fn values(&self) -> impl Iterator<Item = i64> + '_ {
        self.series.iter().flat_map(|s| s.values.iter().copied())
    }

    /// Upper end of the y-axis, with some headroom above the largest value.
    pub fn y_max(&self) -> i64 {
        let max = self.values().max().unwrap_or_default().max(0);
        max.saturating_add(max / 10).saturating_add(1)
    }

    /// Lower end of the y-axis: `0`, or below the smallest value if some are negative.
    pub fn y_min(&self) -> i64 {
        let min = self.values().min().unwrap_or_default().min(0);
        if min == 0 {
            0
        } else {
            min.saturating_add(min / 10).saturating_sub(1)
        }
    }
}

/// Upper bound on the number of x-axis ticks. Larger domains get a wider step.
pub const MAX_TICKS: i64 = 50;

/// The smallest multiple of `step` that places at most [`MAX_TICKS`] ticks on `0..=max`.
pub fn tick_step(step: i64, max: i64) -> i64 {
    let step = step.max(1);
    let min_step = max.max(0) / (MAX_TICKS - 1) + 1;
    if step >= min_step {
        step
    } else {
        min_step.div_euclid(step) * step + if min_step % step == 0 { 0 } else { step }
    }
}

/// Tick positions `0, step, 2 * step, ...` up to and including `max`. The step is widened by
/// [`tick_step`] if there would be too many ticks.
pub fn ticks(step: i64, max: i64) -> Vec<i64> {
    let step = tick_step(step, max);
    (0..=max.max(0) / step).map(|i| i * step).collect()
}

/// The x-axis ends at [`DOMAIN_MAX`], or at the next multiple of `step` if the data goes further.
/// Saturates at the data maximum if that multiple does not fit into an `i64`.
pub fn domain_max(data_max: i64, step: i64) -> i64 {
    if data_max <= DOMAIN_MAX {
        return DOMAIN_MAX;
    }
    let step = step.max(1);
    match data_max % step {
        0 => data_max,
        rem => data_max.checked_add(step - rem).unwrap_or(data_max),
    }
}

/// Output path for `input`: the text of its file name before the first `.`, with `.png` appended,
/// in the same directory.
///
/// ```
/// # use std::path::Path;
/// # use virtmem::chart::output_path;
/// assert_eq!(output_path("data.run1.csv").unwrap(), Path::new("data.png"));
/// ```
pub fn output_path(input: impl AsRef<Path>) -> Result<PathBuf, ChartError> {
    let input = input.as_ref();
    let prefix = input
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.split('.').next())
        .filter(|prefix| !prefix.is_empty())
        .ok_or_else(|| ChartError::OutputName(input.to_path_buf()))?;
    Ok(input.with_file_name(format!("{prefix}.png")))
}

/// Result of a successful conversion.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub table: ColumnTable,
    pub output: PathBuf,
}

/// Read the CSV at `input`, check its columns and draw the chart with `renderer` into the file
/// given by [`output_path`].
pub fn convert<R: Renderer + ?Sized>(
    input: impl AsRef<Path>,
    options: &ChartOptions,
    renderer: &mut R,
) -> Result<Conversion, ChartError> {
    let input = input.as_ref();
    log::info!("Loading: {input:?}");
    let table = ColumnTable::from_path(input)?;
    log::debug!("Read {} rows from {input:?}", table.len());

    let request = ChartRequest::from_table(&table, options)?;
    let output = output_path(input)?;

    log::debug!("Plotting {output:?}");
    renderer.render(&request, &output)?;
    log::info!("Wrote {output:?}");

    Ok(Conversion { table, output })
}

#[cfg(test)]
mod test {
    use super::*;

    fn table(data: &str) -> ColumnTable {
        ColumnTable::from_reader(data.as_bytes(), "test.csv").unwrap()
    }

    #[test]
    fn tick_positions() {
        assert_eq!(
            ticks(5, 100),
            vec![0, 5, 10, 15, 20, 25, 30, 35, 40, 45, 50, 55, 60, 65, 70, 75, 80, 85, 90, 95, 100]
        );
        assert_eq!(ticks(20, 100), vec![0, 20, 40, 60, 80, 100]);
        assert_eq!(ticks(30, 100), vec![0, 30, 60, 90]);
    }

    #[test]
    fn domain_extends_past_data() {
        assert_eq!(domain_max(0, 5), 100);
        assert_eq!(domain_max(100, 20), 100);
        assert_eq!(domain_max(101, 20), 120);
        assert_eq!(domain_max(128, 5), 130);
    }

    #[test]
    fn output_name_from_first_dot() {
        assert_eq!(output_path("data.run1.csv").unwrap(), Path::new("data.png"));
        assert_eq!(output_path("results.csv").unwrap(), Path::new("results.png"));
        assert_eq!(output_path("results").unwrap(), Path::new("results.png"));
        assert_eq!(
            output_path("runs/fifo.sort.csv").unwrap(),
            Path::new("runs/fifo.png")
        );
        assert!(matches!(
            output_path(".csv").unwrap_err(),
            ChartError::OutputName(_)
        ));
    }

    #[test]
    fn classic_request() {
        let t = table("Frames,Faults,Reads,Writes\n0,1,2,3\n5,2,3,1\n");
        let request = ChartRequest::from_table(&t, &ChartOptions::classic()).unwrap();

        assert_eq!(request.frames, vec![0, 5]);
        let names: Vec<&str> = request.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Faults", "Writes", "Reads"]);
        assert_eq!(request.series[1].values, vec![3, 1]);
        assert_eq!(request.ticks, ticks(5, 100));
        assert_eq!(request.x_max, 100);
        assert_eq!(request.title, None);
        assert!(!request.show_legend);
    }

    #[test]
    fn titled_request() {
        let t = table("Writes,Reads,Faults,Frames\n3,2,1,0\n1,3,2,5\n");
        let request = ChartRequest::from_table(&t, &ChartOptions::titled("FIFO / sort")).unwrap();

        let names: Vec<&str> = request.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Faults", "Reads", "Writes"]);
        assert_eq!(request.series[1].values, vec![2, 3]);
        assert_eq!(request.ticks, vec![0, 20, 40, 60, 80, 100]);
        assert_eq!(request.title.as_deref(), Some("FIFO / sort"));
        assert_eq!(request.x_label.as_deref(), Some("Frames"));
        assert!(request.show_legend);
        assert!(request.tight_layout);
    }

    #[test]
    fn missing_column() {
        let t = table("Frames,Faults,Writes\n1,2,3\n");
        assert_eq!(
            ChartRequest::from_table(&t, &ChartOptions::classic()),
            Err(SchemaError::MissingColumn("Reads".to_string()))
        );
    }

    #[test]
    fn y_axis_headroom() {
        let t = table("Frames,Faults,Reads,Writes\n3,100,40,7\n");
        let request = ChartRequest::from_table(&t, &ChartOptions::classic()).unwrap();
        assert_eq!(request.y_max(), 111);
        assert_eq!(request.y_min(), 0);

        let t = table("Frames,Faults,Reads,Writes\n");
        let request = ChartRequest::from_table(&t, &ChartOptions::classic()).unwrap();
        assert_eq!(request.y_max(), 1);
        assert_eq!(request.y_min(), 0);
        assert!(request.frames.is_empty());
    }

    #[test]
    fn negative_values_are_inside_the_y_axis() {
        let t = table("Frames,Faults,Reads,Writes\n3,-50,-40,-30\n");
        let request = ChartRequest::from_table(&t, &ChartOptions::classic()).unwrap();
        assert_eq!(request.y_min(), -56);
        assert_eq!(request.y_max(), 1);
        for value in request.series.iter().flat_map(|s| s.values.iter()) {
            assert!((request.y_min()..request.y_max()).contains(value));
        }
    }

    #[test]
    fn extreme_values_saturate() {
        let t = table(&format!(
            "Frames,Faults,Reads,Writes\n{max},{max},{min},0\n",
            max = i64::MAX,
            min = i64::MIN
        ));
        let request = ChartRequest::from_table(&t, &ChartOptions::classic()).unwrap();
        assert_eq!(request.x_max, i64::MAX);
        assert_eq!(request.y_max(), i64::MAX);
        assert_eq!(request.y_min(), i64::MIN);
        assert!(request.ticks.len() as i64 <= MAX_TICKS);
        assert!(request.ticks.iter().all(|t| *t <= request.x_max));
    }

    #[test]
    fn tick_count_is_bounded() {
        let t = table("Frames,Faults,Reads,Writes\n1000000000000,1,1,1\n");
        let request = ChartRequest::from_table(&t, &ChartOptions::classic()).unwrap();
        assert_eq!(request.x_max, 1_000_000_000_000);
        assert!(request.ticks.len() as i64 <= MAX_TICKS);
        let step = request.ticks[1];
        assert_eq!(step % 5, 0);
        assert!(request.ticks.windows(2).all(|w| w[1] - w[0] == step));

        assert_eq!(tick_step(5, 100), 5);
        assert_eq!(tick_step(1, 100), 3);
        assert_eq!(tick_step(5, 1000), 25);
        assert_eq!(ticks(1, 100).len(), 34);
    }
}

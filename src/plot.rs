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
use std::{path::PathBuf, process};

use clap::Parser;

use virtmem::{
    chart::{self, ChartError, ChartOptions, SeriesOrder},
    render::PngRenderer,
    util,
};

/// Plot the page faults, disk reads and disk writes of a results file against the frames.
///
/// The chart is written next to the input, named after the part of its file name before the
/// first dot (`results.csv` becomes `results.png`).
#[derive(Parser, Debug)]
#[command(about, long_about = None)]
struct Args {
    /// CSV file with (at least) the columns Frames, Faults, Reads and Writes.
    input: PathBuf,
    /// Chart title. Giving a title also adds an axis label and a legend, and spaces the ticks
    /// 20 frames apart.
    title: Option<String>,
    /// Overwrite the distance between two ticks on the x-axis.
    #[arg(short, long, value_parser = clap::value_parser!(i64).range(1..))]
    tick_step: Option<i64>,
    /// Always draw a legend.
    #[arg(short, long)]
    legend: bool,
    /// Overwrite the order in which the series are drawn.
    #[arg(long, value_enum)]
    order: Option<SeriesOrder>,
}

fn main() {
    util::init_logging();
    let args = Args::parse();

    let mut options = match args.title {
        Some(title) => ChartOptions::titled(title),
        None => ChartOptions::classic(),
    };
    if let Some(tick_step) = args.tick_step {
        options.tick_step = tick_step;
    }
    if let Some(order) = args.order {
        options.order = order;
    }
    options.show_legend |= args.legend;

    match chart::convert(&args.input, &options, &mut PngRenderer::default()) {
        Ok(conversion) => println!("Wrote {}", conversion.output.display()),
        Err(e) => {
            let kind = match &e {
                ChartError::Render(_) => "Render error",
                e if e.is_schema() => "Schema error",
                _ => "Input error",
            };
            eprintln!("{kind}: {e}");
            process::exit(1)
        }
    }
}

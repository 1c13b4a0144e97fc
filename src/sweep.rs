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
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use itertools::Itertools;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use virtmem::{
    results,
    sim::{self, Policy, Program, SimConfig, SimReport, DEFAULT_SEED, MIN_FRAMES, PAGE_SIZE},
    util,
};

/// Run the same workload with an increasing number of frames, and append all counters to the
/// results file.
#[derive(Parser, Debug)]
#[command(about, long_about = None)]
struct Args {
    /// Number of virtual pages.
    npages: usize,
    /// Page replacement policy.
    #[arg(value_enum)]
    policy: Policy,
    /// Workload to run.
    #[arg(value_enum)]
    program: Program,
    /// Smallest number of frames.
    #[arg(long, default_value_t = MIN_FRAMES)]
    from: usize,
    /// Largest number of frames. Defaults to the number of pages.
    #[arg(long)]
    to: Option<usize>,
    /// Increment of the number of frames.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    step: u64,
    /// CSV file to which the counters are appended.
    #[arg(short, long, default_value = "results.csv")]
    output: PathBuf,
    /// Seed for the random replacement decisions.
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    seed: u64,
    /// Size of a page in bytes.
    #[arg(long, default_value_t = PAGE_SIZE)]
    page_size: usize,
}

fn main() -> Result<()> {
    let multi = util::init_progress_logging()?;
    let args = Args::parse();

    let to = args.to.unwrap_or(args.npages);
    let configs = (args.from..=to)
        .step_by(args.step as usize)
        .map(|frames| {
            SimConfig::new(args.npages, frames, args.policy, args.program)
                .with_page_size(args.page_size)
                .with_seed(args.seed)
        })
        .collect_vec();
    if configs.is_empty() {
        bail!("No frame counts between {} and {to}", args.from);
    }

    log::info!(
        "Simulating {} with {} frame counts between {} and {to}",
        args.program,
        configs.len(),
        args.from
    );

    let pb = multi.add(
        ProgressBar::new(configs.len() as u64).with_style(
            ProgressStyle::with_template(
                "[{bar:80}] run: {pos:>5}/{len:5}, elapsed: {elapsed}, eta: {eta}",
            )?
            .progress_chars("##-"),
        ),
    );

    let reports = configs
        .into_par_iter()
        .progress_with(pb)
        .map(|config| sim::run(config).with_context(|| format!("Error simulating {config}")))
        .collect::<Result<Vec<SimReport>>>()?;

    for report in &reports {
        log::info!("{report}");
    }

    results::append_records(
        &args.output,
        reports
            .iter()
            .sorted_by_key(|report| report.config.frames)
            .map(SimReport::record),
    )
    .with_context(|| format!("Cannot append the results to {:?}", args.output))?;
    let total = results::read_records(&args.output)
        .with_context(|| format!("Cannot read back {:?}", args.output))?
        .len();
    println!(
        "Appended {} runs to {}, which now holds {total} runs",
        reports.len(),
        args.output.display()
    );

    Ok(())
}

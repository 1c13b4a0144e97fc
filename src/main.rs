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

use anyhow::Context;
use clap::Parser;

use virtmem::{
    results,
    sim::{self, Policy, Program, SimConfig, DEFAULT_SEED, PAGE_SIZE},
    util,
};

/// Run a workload on a simulated virtual memory and record its page faults and disk transfers.
#[derive(Parser, Debug)]
#[command(about, long_about = None)]
struct Args {
    /// Number of virtual pages.
    npages: usize,
    /// Number of physical frames.
    nframes: usize,
    /// Page replacement policy.
    #[arg(value_enum)]
    policy: Policy,
    /// Workload to run.
    #[arg(value_enum)]
    program: Program,
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

fn main() -> anyhow::Result<()> {
    util::init_logging();
    let args = Args::parse();

    let config = SimConfig::new(args.npages, args.nframes, args.policy, args.program)
        .with_page_size(args.page_size)
        .with_seed(args.seed);

    let report = sim::run(config).with_context(|| format!("Cannot simulate {config}"))?;
    log::info!("{} result is {}", config.program, report.checksum);
    println!("{report}");

    results::append_record(&args.output, &report.record())
        .with_context(|| format!("Cannot append the results to {:?}", args.output))?;

    Ok(())
}

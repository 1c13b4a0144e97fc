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
//! Library for simulating demand paging and plotting the resulting page fault counters.
//!
//! The simulator ([`sim`]) appends one row per run to a results file ([`results`]). The
//! converter ([`chart::convert`]) reads such a file ([`table`]) and draws the faults, disk reads
//! and disk writes against the number of frames ([`render`]).

pub mod chart;
pub mod render;
pub mod results;
pub mod sim;
pub mod table;
pub mod util;

pub mod prelude {
    pub use super::{
        chart::{convert, ChartError, ChartOptions, ChartRequest, Conversion, SeriesOrder},
        render::{PngRenderer, Renderer},
        results::{append_record, append_records, ResultRecord},
        sim::{run, Policy, Program, SimConfig, SimError, SimReport},
        table::{ColumnTable, TableError},
    };
}

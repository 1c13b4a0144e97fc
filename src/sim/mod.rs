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
//! Demand paging simulator.
//!
//! A workload ([`Program`]) runs on [`PagedMemory`], a virtual memory of `pages` pages backed by
//! only `frames` physical frames and a [`Disk`]. Each access checks the [`PageTable`]; accesses
//! that are not permitted raise a page fault, which loads (and possibly evicts) pages as decided
//! by the [`ReplacementPolicy`].
//!
//! All pages start on disk. A loaded page is mapped read-only; the first write to it raises
//! another fault that marks it dirty. Only dirty pages are written back to disk when evicted.

use std::fmt;

use serde::Serialize;

pub mod disk;
pub mod page_table;
pub mod policy;
pub mod program;

pub use disk::Disk;
pub use page_table::{Access, Entry, Op, PageTable};
pub use policy::{Policy, ReplacementPolicy};
pub use program::{Memory, Program};

use crate::results::ResultRecord;

pub const PAGE_SIZE: usize = 4096;
pub const MIN_PAGES: usize = 3;
pub const MIN_FRAMES: usize = 3;
pub const DEFAULT_SEED: u64 = 0x5eed;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SimError {
    #[error("Your page count ({0}) is too small. The minimum number of pages required is 3.")]
    TooFewPages(usize),
    #[error("Your frame count ({0}) is too small. The minimum number of frames required is 3.")]
    TooFewFrames(usize),
    #[error("The page size must not be zero.")]
    ZeroPageSize,
    #[error("Address {addr} is outside of the {size} bytes of virtual memory.")]
    AddressOutOfRange { addr: usize, size: usize },
}

/// Parameters of a single simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SimConfig {
    pub pages: usize,
    pub frames: usize,
    pub policy: Policy,
    pub program: Program,
    pub page_size: usize,
    pub seed: u64,
}

impl SimConfig {
    pub fn new(pages: usize, frames: usize, policy: Policy, program: Program) -> Self {
        Self {
            pages,
            frames,
            policy,
            program,
            page_size: PAGE_SIZE,
            seed: DEFAULT_SEED,
        }
    }

    pub fn with_page_size(self, page_size: usize) -> Self {
        Self { page_size, ..self }
    }

    pub fn with_seed(self, seed: u64) -> Self {
        Self { seed, ..self }
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if self.pages < MIN_PAGES {
            return Err(SimError::TooFewPages(self.pages));
        }
        if self.frames < MIN_FRAMES {
            return Err(SimError::TooFewFrames(self.frames));
        }
        if self.page_size == 0 {
            return Err(SimError::ZeroPageSize);
        }
        Ok(())
    }
}

impl fmt::Display for SimConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} on {} pages with {} frames ({})",
            self.program, self.pages, self.frames, self.policy
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counters {
    /// Page faults, including write faults on resident pages.
    pub faults: u64,
    /// Pages read from disk.
    pub reads: u64,
    /// Dirty pages written back to disk.
    pub writes: u64,
}

/// Virtual memory backed by a small number of frames.
pub struct PagedMemory {
    page_size: usize,
    table: PageTable,
    physmem: Vec<u8>,
    disk: Disk,
    policy: Box<dyn ReplacementPolicy + Send>,
    faults: u64,
}

impl PagedMemory {
    /// Build the memory described by `config`. The config is expected to be valid.
    pub fn new(config: &SimConfig) -> Self {
        Self {
            page_size: config.page_size,
            table: PageTable::new(config.pages, config.frames),
            physmem: vec![0; config.frames * config.page_size],
            disk: Disk::new(config.pages, config.page_size),
            policy: config.policy.build(config.seed),
            faults: 0,
        }
    }

    pub fn counters(&self) -> Counters {
        Counters {
            faults: self.faults,
            reads: self.disk.reads(),
            writes: self.disk.writes(),
        }
    }

    pub fn page_table(&self) -> &PageTable {
        &self.table
    }

    /// Translate `addr` into an index of the physical memory, faulting as often as needed.
    fn translate(&mut self, addr: usize, op: Op) -> Result<usize, SimError> {
        let size = self.size();
        if addr >= size {
            return Err(SimError::AddressOutOfRange { addr, size });
        }
        let page = addr / self.page_size;
        let offset = addr % self.page_size;
        loop {
            let entry = self.table.entry(page);
            if entry.access.permits(op) {
                return Ok(entry.frame * self.page_size + offset);
            }
            self.page_fault(page);
        }
    }

    fn page_fault(&mut self, page: usize) {
        self.faults += 1;
        match self.table.entry(page).access {
            Access::Read => {
                log::trace!("write fault on page {page}");
                self.table.set_access(page, Access::ReadWrite);
            }
            Access::None => {
                let frame = self.policy.select_frame(page, self.table.frames());
                let range = frame * self.page_size..(frame + 1) * self.page_size;

                if let Some(victim) = self.table.occupant(frame) {
                    if self.table.entry(victim).access == Access::ReadWrite {
                        log::trace!("write back page {victim} from frame {frame}");
                        self.disk.write(victim, &self.physmem[range.clone()]);
                    }
                    self.table.unmap(victim);
                }

                log::trace!("page fault on page {page}, loading into frame {frame}");
                self.disk.read(page, &mut self.physmem[range]);
                self.table.map(page, frame, Access::Read);
                self.policy.loaded(page, frame);
            }
            Access::ReadWrite => {}
        }
    }
}

impl Memory for PagedMemory {
    fn size(&self) -> usize {
        self.table.num_pages() * self.page_size
    }

    fn read(&mut self, addr: usize) -> Result<u8, SimError> {
        let idx = self.translate(addr, Op::Read)?;
        Ok(self.physmem[idx])
    }

    fn write(&mut self, addr: usize, value: u8) -> Result<(), SimError> {
        let idx = self.translate(addr, Op::Write)?;
        self.physmem[idx] = value;
        Ok(())
    }
}

/// Outcome of a simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SimReport {
    pub config: SimConfig,
    pub counters: Counters,
    /// Checksum computed by the workload.
    pub checksum: i64,
}

impl SimReport {
    pub fn record(&self) -> ResultRecord {
        ResultRecord {
            frames: self.config.frames as u64,
            pages: self.config.pages as u64,
            faults: self.counters.faults,
            reads: self.counters.reads,
            writes: self.counters.writes,
        }
    }
}

impl fmt::Display for SimReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Frames: {}, Pages: {}, Faults: {}, Reads: {}, Writes: {}",
            self.config.frames,
            self.config.pages,
            self.counters.faults,
            self.counters.reads,
            self.counters.writes
        )
    }
}

/// Run the workload of `config` on a fresh paged memory.
pub fn run(config: SimConfig) -> Result<SimReport, SimError> {
    config.validate()?;
    log::debug!("Simulating {config}");

    let mut memory = PagedMemory::new(&config);
    let checksum = config.program.run(&mut memory)?;
    log::debug!("{} result is {checksum}", config.program);
    let table = memory.page_table();
    log::trace!(
        "{} of {} frames in use at the end",
        table.resident().count(),
        table.num_frames()
    );

    Ok(SimReport {
        config,
        counters: memory.counters(),
        checksum,
    })
}

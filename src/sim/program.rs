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
//! Workloads that run on the simulated memory.

use clap::ValueEnum;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Serialize;

use super::SimError;

/// Byte-addressable memory.
pub trait Memory {
    /// Size in bytes.
    fn size(&self) -> usize;

    fn read(&mut self, addr: usize) -> Result<u8, SimError>;

    fn write(&mut self, addr: usize, value: u8) -> Result<(), SimError>;
}

/// Plain memory without any paging.
impl Memory for Vec<u8> {
    fn size(&self) -> usize {
        self.len()
    }

    fn read(&mut self, addr: usize) -> Result<u8, SimError> {
        self.get(addr).copied().ok_or(SimError::AddressOutOfRange {
            addr,
            size: self.len(),
        })
    }

    fn write(&mut self, addr: usize, value: u8) -> Result<(), SimError> {
        let size = self.len();
        let byte = self
            .get_mut(addr)
            .ok_or(SimError::AddressOutOfRange { addr, size })?;
        *byte = value;
        Ok(())
    }
}

const SORT_SEED: u64 = 4856;
const FOCUS_SEED: u64 = 38290;

/// Available workloads.
#[derive(
    ValueEnum,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    strum::Display,
    strum::EnumIter,
    strum_macros::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Program {
    /// Fill memory with random bytes and sort them.
    Sort,
    /// Write every byte once, then read the whole memory ten times in order.
    Scan,
    /// Many small bursts of random writes, each within a narrow window.
    Focus,
}

impl Program {
    /// Run the workload on `memory` and return its checksum.
    pub fn run<M: Memory + ?Sized>(self, memory: &mut M) -> Result<i64, SimError> {
        match self {
            Program::Sort => sort(memory),
            Program::Scan => scan(memory),
            Program::Focus => focus(memory),
        }
    }
}

fn signed_sum<M: Memory + ?Sized>(memory: &mut M) -> Result<i64, SimError> {
    let mut total = 0;
    for addr in 0..memory.size() {
        total += memory.read(addr)? as i8 as i64;
    }
    Ok(total)
}

fn sort<M: Memory + ?Sized>(memory: &mut M) -> Result<i64, SimError> {
    let mut rng = StdRng::seed_from_u64(SORT_SEED);
    for addr in 0..memory.size() {
        memory.write(addr, rng.gen())?;
    }
    heap_sort(memory)?;
    signed_sum(memory)
}

fn scan<M: Memory + ?Sized>(memory: &mut M) -> Result<i64, SimError> {
    for addr in 0..memory.size() {
        memory.write(addr, (addr % 256) as u8)?;
    }
    let mut total = 0;
    for _ in 0..10 {
        for addr in 0..memory.size() {
            total += memory.read(addr)? as i64;
        }
    }
    Ok(total)
}

fn focus<M: Memory + ?Sized>(memory: &mut M) -> Result<i64, SimError> {
    const BURSTS: usize = 100;
    const WRITES: usize = 100;
    const WINDOW: usize = 25;

    let size = memory.size();
    if size == 0 {
        return Ok(0);
    }
    let mut rng = StdRng::seed_from_u64(FOCUS_SEED);
    for addr in 0..size {
        memory.write(addr, 0)?;
    }
    for _ in 0..BURSTS {
        let start = rng.gen_range(0..size);
        for _ in 0..WRITES {
            let addr = (start + rng.gen_range(0..WINDOW)) % size;
            memory.write(addr, rng.gen())?;
        }
    }
    signed_sum(memory)
}

/// In-place heap sort of all bytes, compared as signed values.
fn heap_sort<M: Memory + ?Sized>(memory: &mut M) -> Result<(), SimError> {
    let len = memory.size();
    for root in (0..len / 2).rev() {
        sift_down(memory, root, len)?;
    }
    for end in (1..len).rev() {
        swap(memory, 0, end)?;
        sift_down(memory, 0, end)?;
    }
    Ok(())
}

fn sift_down<M: Memory + ?Sized>(
    memory: &mut M,
    mut root: usize,
    end: usize,
) -> Result<(), SimError> {
    loop {
        let mut child = 2 * root + 1;
        if child >= end {
            return Ok(());
        }
        if child + 1 < end && signed(memory, child)? < signed(memory, child + 1)? {
            child += 1;
        }
        if signed(memory, root)? >= signed(memory, child)? {
            return Ok(());
        }
        swap(memory, root, child)?;
        root = child;
    }
}

fn signed<M: Memory + ?Sized>(memory: &mut M, addr: usize) -> Result<i8, SimError> {
    Ok(memory.read(addr)? as i8)
}

fn swap<M: Memory + ?Sized>(memory: &mut M, a: usize, b: usize) -> Result<(), SimError> {
    let x = memory.read(a)?;
    let y = memory.read(b)?;
    memory.write(a, y)?;
    memory.write(b, x)
}

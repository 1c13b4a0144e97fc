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
//! Backing store for evicted pages.

/// A disk of fixed-size blocks, one per virtual page. Counts the block transfers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disk {
    block_size: usize,
    data: Vec<u8>,
    reads: u64,
    writes: u64,
}

impl Disk {
    pub fn new(blocks: usize, block_size: usize) -> Self {
        Self {
            block_size,
            data: vec![0; blocks * block_size],
            reads: 0,
            writes: 0,
        }
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn num_blocks(&self) -> usize {
        self.data.len() / self.block_size.max(1)
    }

    /// Copy `block` into `buf`, which must be one block long.
    pub fn read(&mut self, block: usize, buf: &mut [u8]) {
        let start = block * self.block_size;
        buf.copy_from_slice(&self.data[start..start + self.block_size]);
        self.reads += 1;
    }

    /// Store `buf`, which must be one block long, in `block`.
    pub fn write(&mut self, block: usize, buf: &[u8]) {
        let start = block * self.block_size;
        self.data[start..start + self.block_size].copy_from_slice(buf);
        self.writes += 1;
    }

    pub fn reads(&self) -> u64 {
        self.reads
    }

    pub fn writes(&self) -> u64 {
        self.writes
    }
}

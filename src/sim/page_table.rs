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
//! Page table and frame table of the simulated MMU.

/// Protection of a page table entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Access {
    /// The page is not resident.
    #[default]
    None,
    /// Resident and clean.
    Read,
    /// Resident and dirty.
    ReadWrite,
}

/// Kind of memory access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Read,
    Write,
}

impl Access {
    /// Whether an access of kind `op` goes through without a page fault.
    pub fn permits(self, op: Op) -> bool {
        matches!(
            (self, op),
            (Access::Read, Op::Read) | (Access::ReadWrite, Op::Read | Op::Write)
        )
    }

    pub fn is_resident(self) -> bool {
        self != Access::None
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Entry {
    pub frame: usize,
    pub access: Access,
}

/// Maps pages to frames, and keeps the inverse mapping for the frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTable {
    entries: Vec<Entry>,
    frames: Vec<Option<usize>>,
}

impl PageTable {
    pub fn new(pages: usize, frames: usize) -> Self {
        Self {
            entries: vec![Entry::default(); pages],
            frames: vec![None; frames],
        }
    }

    pub fn num_pages(&self) -> usize {
        self.entries.len()
    }

    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn entry(&self, page: usize) -> Entry {
        self.entries[page]
    }

    /// For each frame, the page it currently holds.
    pub fn frames(&self) -> &[Option<usize>] {
        &self.frames
    }

    pub fn occupant(&self, frame: usize) -> Option<usize> {
        self.frames[frame]
    }

    /// Map `page` into `frame`. The frame must be free.
    pub fn map(&mut self, page: usize, frame: usize, access: Access) {
        debug_assert!(self.frames[frame].is_none(), "frame {frame} is in use");
        self.entries[page] = Entry { frame, access };
        self.frames[frame] = Some(page);
    }

    pub fn set_access(&mut self, page: usize, access: Access) {
        self.entries[page].access = access;
    }

    /// Remove `page` from memory, freeing its frame.
    pub fn unmap(&mut self, page: usize) {
        let entry = self.entries[page];
        if entry.access.is_resident() && self.frames[entry.frame] == Some(page) {
            self.frames[entry.frame] = None;
        }
        self.entries[page] = Entry::default();
    }

    /// Iterate over all resident `(page, frame)` pairs.
    pub fn resident(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.frames
            .iter()
            .enumerate()
            .filter_map(|(frame, page)| page.map(|page| (page, frame)))
    }
}

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
//! Page replacement policies.

use std::collections::VecDeque;

use clap::ValueEnum;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use serde::Serialize;

/// Available page replacement policies.
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
pub enum Policy {
    /// Evict a random frame.
    Rand,
    /// Evict the frame that was loaded first.
    Fifo,
    /// Keep even pages in even frames and odd pages in odd frames, evicting randomly within the
    /// matching half.
    Custom,
}

impl Policy {
    /// Instantiate the policy, seeding its random choices with `seed`.
    pub fn build(self, seed: u64) -> Box<dyn ReplacementPolicy + Send> {
        match self {
            Policy::Rand => Box::new(Random::new(seed)),
            Policy::Fifo => Box::new(Fifo::default()),
            Policy::Custom => Box::new(Parity::new(seed)),
        }
    }
}

/// Decides where a faulting page is loaded.
pub trait ReplacementPolicy {
    /// Pick the frame that receives `page`, given the current occupant of each frame. If the
    /// chosen frame is occupied, its page is evicted.
    fn select_frame(&mut self, page: usize, frames: &[Option<usize>]) -> usize;

    /// Called after `page` was loaded into `frame`.
    fn loaded(&mut self, _page: usize, _frame: usize) {}
}

fn first_free(frames: &[Option<usize>]) -> Option<usize> {
    frames.iter().position(Option::is_none)
}

/// First in, first out.
#[derive(Debug, Clone, Default)]
pub struct Fifo {
    queue: VecDeque<usize>,
}

impl ReplacementPolicy for Fifo {
    fn select_frame(&mut self, _page: usize, frames: &[Option<usize>]) -> usize {
        match first_free(frames) {
            Some(frame) => frame,
            None => self.queue.pop_front().unwrap_or_default(),
        }
    }

    fn loaded(&mut self, _page: usize, frame: usize) {
        self.queue.push_back(frame);
    }
}

/// Uniformly random frame, preferring free ones.
#[derive(Debug, Clone)]
pub struct Random {
    rng: StdRng,
}

impl Random {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl ReplacementPolicy for Random {
    fn select_frame(&mut self, _page: usize, frames: &[Option<usize>]) -> usize {
        let free: Vec<usize> = (0..frames.len()).filter(|f| frames[*f].is_none()).collect();
        match free.choose(&mut self.rng) {
            Some(frame) => *frame,
            None => self.rng.gen_range(0..frames.len()),
        }
    }
}

/// Random replacement restricted to frames with the same parity as the page.
#[derive(Debug, Clone)]
pub struct Parity {
    rng: StdRng,
}

impl Parity {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl ReplacementPolicy for Parity {
    fn select_frame(&mut self, page: usize, frames: &[Option<usize>]) -> usize {
        let mut candidates: Vec<usize> = (page % 2..frames.len()).step_by(2).collect();
        // a single frame has no odd half
        if candidates.is_empty() {
            candidates = (0..frames.len()).collect();
        }
        let free: Vec<usize> = candidates
            .iter()
            .copied()
            .filter(|f| frames[*f].is_none())
            .collect();
        let pool = if free.is_empty() { &candidates } else { &free };
        pool.choose(&mut self.rng).copied().unwrap_or_default()
    }
}

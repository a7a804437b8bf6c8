//! counts.rs
//! Selection count table shared by concurrent bootstrap tasks.
//!
//! The key set is fixed at construction; each key owns an atomic counter, so
//! tasks never contend on a table-wide lock and increments commute.

use crate::data::VariableId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

#[derive(Debug)]
pub struct SelectionCounts {
    candidates: Vec<VariableId>,
    slots: Vec<AtomicU32>,
    position: HashMap<VariableId, usize>,
}

impl SelectionCounts {
    /// Every candidate starts at zero.
    pub fn new(candidates: &[VariableId]) -> Self {
        Self {
            candidates: candidates.to_vec(),
            slots: candidates.iter().map(|_| AtomicU32::new(0)).collect(),
            position: candidates.iter().enumerate().map(|(i, &v)| (v, i)).collect(),
        }
    }

    pub fn candidates(&self) -> &[VariableId] { &self.candidates }

    /// Returns false for variables outside the table.
    pub fn increment(&self, variable: VariableId) -> bool {
        match self.position.get(&variable) {
            Some(&slot) => {
                self.slots[slot].fetch_add(1, Ordering::Relaxed);
                true
            }
            None => false,
        }
    }

    /// Counts one bootstrap ranking: a candidate is selected when its first
    /// position in `ranking` is below `top_q`. Candidates missing from the
    /// ranking are not selected; non-candidates still occupy their position.
    pub fn record(&self, ranking: &[VariableId], top_q: usize) -> usize {
        let mut selected = 0;
        for (rank, v) in ranking.iter().enumerate().take(top_q) {
            if ranking[..rank].contains(v) {
                continue;
            }
            if self.increment(*v) {
                selected += 1;
            }
        }
        selected
    }

    pub fn get(&self, variable: VariableId) -> Option<u32> {
        self.position.get(&variable).map(|&slot| self.slots[slot].load(Ordering::Relaxed))
    }

    /// Counts in candidate order. Read only after every task has joined.
    pub fn snapshot(&self) -> Vec<u32> {
        self.slots.iter().map(|c| c.load(Ordering::Relaxed)).collect()
    }
}

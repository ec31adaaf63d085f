//! Epoch ring for the distribution-time estimate.
//!
//! Each (object, replica) pair produces a transfer time. Pairs are dealt
//! round-robin onto `width` slots, one per worker. When the last slot of a
//! round is written, the mean of all slots is added to the running total.
//! The total therefore approximates the wall time of `width` workers writing
//! in parallel rather than the sum of all transfer times.
//!
//! A trailing partial round is never folded.

use std::num::NonZeroUsize;

/// Fixed ring of per-worker timing slots with a mean fold per full round.
#[derive(Debug, Clone)]
pub struct EpochRing {
    slots: Vec<f64>,
    total: f64,
    folds: u64,
}

impl EpochRing {
    /// Create a ring with one slot per worker.
    #[must_use]
    pub fn new(width: NonZeroUsize) -> Self {
        Self { slots: vec![0.0; width.get()], total: 0.0, folds: 0 }
    }

    /// Store `value` for pair number `sequence`.
    ///
    /// The slot is `sequence % width`. Writing the last slot closes the
    /// round and folds the slot mean into the total.
    pub fn record(&mut self, sequence: u64, value: f64) {
        let width = self.slots.len();
        let slot = (sequence % width as u64) as usize;
        self.slots[slot] = value;
        if slot == width - 1 {
            let mean = self.slots.iter().sum::<f64>() / width as f64;
            self.total += mean;
            self.folds += 1;
        }
    }

    /// Accumulated estimate.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Completed rounds.
    #[must_use]
    pub fn folds(&self) -> u64 {
        self.folds
    }
}

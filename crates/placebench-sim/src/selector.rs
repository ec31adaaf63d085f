//! Windowed selector.
//!
//! The oracle's answer is a static hash; the selector refines it using live
//! load. Starting at the oracle's index `i`, it scores the `W` consecutive
//! candidates `i, i+1, .., i+W-1` (mod `n`) and returns the best one.
//!
//! For window slot `k` three attributes are read from the candidate:
//!
//! - `a[k]`: weighted capacity
//! - `b[k]`: remaining free space
//! - `c[k]`: throughput headroom
//!
//! The score of slot `k` is a cosine-style ratio over the slots `k`, `k+1`
//! and `k+2` (wrapping modulo `W`), where slot `k` first has the pending
//! write subtracted from `b` and `c`:
//!
//! ```text
//!           Σ_j  bc[j] · a[j]
//! d[k] = ────────────────────────────────────────
//!         sqrt( Σ_j bc[j]² · (a[0]² + a[1]² + a[2]²) )
//! ```
//!
//! with `j ∈ {k, k+1, k+2}`, `bc[k] = (b[k] − block)(c[k] − block/10000)`
//! and `bc[j] = b[j]·c[j]` otherwise. Note the normalizer always uses the
//! first three slots' `a`, not the ones being scored.
//!
//! Nothing is clamped: a candidate whose remaining space is below one block
//! yields a negative adjusted term and simply scores lower.

use placebench_core::{BlockSize, Window};

use crate::topology::{Device, Server};

/// Load attributes the selector reads from a candidate.
pub trait LoadProfile {
    /// Capacity weighted by speed (`a`).
    fn weighted_capacity(&self) -> f64;
    /// Remaining free space in bytes (`b`).
    fn free_space(&self) -> f64;
    /// Spare throughput (`c`).
    fn headroom(&self) -> f64;
}

impl LoadProfile for Server {
    fn weighted_capacity(&self) -> f64 {
        self.capacity * self.performance
    }

    fn free_space(&self) -> f64 {
        self.remaining
    }

    fn headroom(&self) -> f64 {
        self.performance - self.workload
    }
}

impl LoadProfile for Device {
    fn weighted_capacity(&self) -> f64 {
        self.capacity * self.bandwidth / self.latency_us
    }

    fn free_space(&self) -> f64 {
        self.remaining
    }

    fn headroom(&self) -> f64 {
        (self.bandwidth - self.workload) / self.latency_us
    }
}

/// Scores and picks candidates within a window.
#[derive(Debug, Clone, Copy)]
pub struct WindowedSelector {
    window: Window,
    block: BlockSize,
}

impl WindowedSelector {
    /// Create a selector for the given window and pending write size.
    #[must_use]
    pub const fn new(window: Window, block: BlockSize) -> Self {
        Self { window, block }
    }

    /// Score every slot of the window starting at `start`.
    ///
    /// Returns one score per slot; slot `k` refers to candidate
    /// `(start + k) % candidates.len()`. Returns an empty vector if there
    /// are no candidates.
    #[must_use]
    pub fn scores<C: LoadProfile>(&self, candidates: &[C], start: usize) -> Vec<f64> {
        let n = candidates.len();
        if n == 0 {
            return Vec::new();
        }
        let w = self.window.get();

        let mut a = Vec::with_capacity(w);
        let mut bc = Vec::with_capacity(w);
        let mut adjusted = Vec::with_capacity(w);
        let pending_space = self.block.as_f64();
        let pending_load = self.block.workload_units();
        for k in 0..w {
            let candidate = &candidates[(start + k) % n];
            let (b, c) = (candidate.free_space(), candidate.headroom());
            a.push(candidate.weighted_capacity());
            bc.push(b * c);
            adjusted.push((b - pending_space) * (c - pending_load));
        }

        let norm_a = a[0] * a[0] + a[1] * a[1] + a[2] * a[2];
        (0..w)
            .map(|k| {
                let (k1, k2) = ((k + 1) % w, (k + 2) % w);
                let own = adjusted[k];
                let numerator = own * a[k] + bc[k1] * a[k1] + bc[k2] * a[k2];
                let denominator =
                    ((own * own + bc[k1] * bc[k1] + bc[k2] * bc[k2]) * norm_a).sqrt();
                numerator / denominator
            })
            .collect()
    }

    /// Pick the best candidate in the window starting at `start`.
    ///
    /// The winner is the first slot whose score is strictly greater than
    /// every earlier slot's and than zero, so exact ties keep the earliest
    /// slot and a window in which no score is positive (or every score is
    /// NaN) falls back to `start` itself. Returns `None` if there are no
    /// candidates.
    #[must_use]
    pub fn select<C: LoadProfile>(&self, candidates: &[C], start: usize) -> Option<usize> {
        let n = candidates.len();
        if n == 0 {
            return None;
        }
        let mut best = 0.0;
        let mut offset = 0;
        for (k, score) in self.scores(candidates, start).into_iter().enumerate() {
            if score > best {
                best = score;
                offset = k;
            }
        }
        Some((start + offset) % n)
    }
}

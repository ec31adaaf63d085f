//! CRUSH placement over a flat bucket.
//!
//! The benchmark models a single failure domain level: every index in the
//! domain is a leaf of one straw2 bucket with equal weight. Replicas are
//! drawn one at a time; a draw that lands on an index already chosen is
//! retried with a new round number, exactly like CRUSH's `chooseleaf firstn`
//! collision handling.

use crate::hash::{placement_hash2, placement_hash3, unit_interval};
use crate::oracle::{check_request, Placement, PlacementAlgorithm, PlacementError};

/// Collision retries per replica before falling back to the first free index.
pub const MAX_RETRIES: usize = 50;

/// CRUSH straw2 oracle.
#[derive(Debug, Clone)]
pub struct CrushPlacement {
    seed: u64,
}

impl CrushPlacement {
    /// Create a CRUSH oracle.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Straw2 selection.
    ///
    /// Every item draws a straw whose length depends on a hash of
    /// `(x, r, item)`; the longest straw wins. All items weigh the same, so
    /// the draw is simply `ln(u)`.
    fn select_straw2(&self, x: u64, r: u64, domain: usize) -> Option<usize> {
        let mut best_idx = None;
        let mut best_draw = f64::NEG_INFINITY;

        for item in 0..domain {
            let u = unit_interval(placement_hash3(self.seed, x, r, item as u64));
            let draw = u.ln();
            if draw > best_draw {
                best_draw = draw;
                best_idx = Some(item);
            }
        }

        best_idx
    }
}

impl Placement for CrushPlacement {
    fn algorithm(&self) -> PlacementAlgorithm {
        PlacementAlgorithm::Crush
    }

    fn place_into(&self, id: u64, domain: usize, out: &mut [usize]) -> Result<(), PlacementError> {
        check_request(out.len(), domain)?;
        let x = placement_hash2(self.seed, id, domain as u64);

        for replica in 0..out.len() {
            let chosen = &out[..replica];
            let picked = (0..MAX_RETRIES)
                .filter_map(|retry| {
                    let r = (replica * MAX_RETRIES + retry) as u64;
                    self.select_straw2(x, r, domain)
                })
                .find(|item| !chosen.contains(item))
                // Retries exhausted: take the first free index so the result
                // stays distinct and deterministic.
                .or_else(|| (0..domain).find(|item| !chosen.contains(item)))
                .ok_or(PlacementError::NotEnoughNodes { needed: out.len(), available: domain })?;
            out[replica] = picked;
        }

        Ok(())
    }
}

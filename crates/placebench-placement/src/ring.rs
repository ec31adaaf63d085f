//! Consistent-hash ring placement.
//!
//! Each physical node contributes `virtual_nodes` points on a 64-bit ring.
//! An object hashes onto the ring and walks clockwise, collecting the owners
//! of the points it passes until it has seen enough distinct nodes.
//!
//! Rings depend only on the domain size, so they are built on first use and
//! cached; a benchmark run touches exactly two sizes (server count and
//! devices per server).

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::hash::{placement_hash, placement_hash2};
use crate::oracle::{check_request, Placement, PlacementAlgorithm, PlacementError};

/// A built ring: points sorted by hash.
#[derive(Debug)]
struct Ring {
    points: Vec<(u64, usize)>,
}

impl Ring {
    fn build(domain: usize, virtual_nodes: usize, seed: u64) -> Self {
        let mut points = Vec::with_capacity(domain * virtual_nodes);
        for node in 0..domain {
            for vnode in 0..virtual_nodes {
                points.push((placement_hash2(seed, node as u64, vnode as u64), node));
            }
        }
        // Ties on hash are broken by node index so the walk order is total.
        points.sort_unstable();
        Self { points }
    }

    fn walk(&self, key: u64, out: &mut [usize]) {
        let start = self.points.partition_point(|&(hash, _)| hash < key);
        let mut filled = 0;
        for &(_, node) in self.points[start..].iter().chain(&self.points[..start]) {
            if filled == out.len() {
                break;
            }
            if !out[..filled].contains(&node) {
                out[filled] = node;
                filled += 1;
            }
        }
        debug_assert_eq!(filled, out.len(), "every node owns at least one point");
    }
}

/// Consistent-hash ring oracle.
#[derive(Debug)]
pub struct RingPlacement {
    virtual_nodes: usize,
    seed: u64,
    rings: RwLock<HashMap<usize, Arc<Ring>>>,
}

impl RingPlacement {
    /// Create a ring oracle with `virtual_nodes` points per node.
    #[must_use]
    pub fn new(virtual_nodes: usize, seed: u64) -> Self {
        Self { virtual_nodes: virtual_nodes.max(1), seed, rings: RwLock::new(HashMap::new()) }
    }

    fn ring(&self, domain: usize) -> Arc<Ring> {
        if let Some(ring) = self.rings.read().get(&domain) {
            return Arc::clone(ring);
        }
        let mut rings = self.rings.write();
        Arc::clone(
            rings
                .entry(domain)
                .or_insert_with(|| Arc::new(Ring::build(domain, self.virtual_nodes, self.seed))),
        )
    }
}

impl Placement for RingPlacement {
    fn algorithm(&self) -> PlacementAlgorithm {
        PlacementAlgorithm::Ring
    }

    fn place_into(&self, id: u64, domain: usize, out: &mut [usize]) -> Result<(), PlacementError> {
        check_request(out.len(), domain)?;
        self.ring(domain).walk(placement_hash(self.seed, id), out);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_ring_distinct_and_in_range() {
        let oracle = RingPlacement::new(8, 0);
        for id in 0..500u64 {
            let nodes = oracle.place(id, 4, 10).unwrap();
            assert_eq!(nodes.len(), 4);
            assert_eq!(nodes.iter().collect::<HashSet<_>>().len(), 4);
            assert!(nodes.iter().all(|&n| n < 10));
        }
    }

    #[test]
    fn test_ring_deterministic() {
        let a = RingPlacement::new(16, 5);
        let b = RingPlacement::new(16, 5);
        for id in [0, 1, 42, u64::MAX] {
            assert_eq!(a.place(id, 3, 12).unwrap(), b.place(id, 3, 12).unwrap());
        }
    }

    #[test]
    fn test_ring_caches_per_domain() {
        let oracle = RingPlacement::new(4, 0);
        oracle.place(1, 2, 10).unwrap();
        oracle.place(1, 1, 4).unwrap();
        oracle.place(2, 2, 10).unwrap();
        assert_eq!(oracle.rings.read().len(), 2);
    }

    #[test]
    fn test_ring_whole_domain() {
        let oracle = RingPlacement::new(1, 0);
        let mut nodes = oracle.place(99, 5, 5).unwrap();
        nodes.sort_unstable();
        assert_eq!(nodes, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_ring_distribution() {
        let oracle = RingPlacement::new(64, 0);
        let mut counts = [0u32; 8];
        for id in 0..8000u64 {
            let primary = oracle.place(placement_hash(1, id), 1, 8).unwrap()[0];
            counts[primary] += 1;
        }
        let min = *counts.iter().min().unwrap();
        let max = *counts.iter().max().unwrap();
        assert!(max <= min * 3, "distribution too uneven: {counts:?}");
    }
}

//! Static modulo placement.
//!
//! The simplest deterministic oracle: the primary is `(id + seed) mod n` and
//! the remaining replicas take the following indices. It has no balancing
//! properties worth measuring but makes expected results easy to write down.

use crate::oracle::{check_request, Placement, PlacementAlgorithm, PlacementError};

/// `id mod n` placement.
#[derive(Debug, Clone, Copy)]
pub struct ModuloPlacement {
    seed: u64,
}

impl ModuloPlacement {
    /// Create a modulo oracle with the given salt.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl Placement for ModuloPlacement {
    fn algorithm(&self) -> PlacementAlgorithm {
        PlacementAlgorithm::StaticModulo
    }

    fn place_into(&self, id: u64, domain: usize, out: &mut [usize]) -> Result<(), PlacementError> {
        check_request(out.len(), domain)?;
        let start = (id.wrapping_add(self.seed) % domain as u64) as usize;
        for (r, slot) in out.iter_mut().enumerate() {
            *slot = (start + r) % domain;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modulo_consecutive() {
        let oracle = ModuloPlacement::new(0);
        assert_eq!(oracle.place(7, 3, 5).unwrap(), vec![2, 3, 4]);
        assert_eq!(oracle.place(9, 3, 5).unwrap(), vec![4, 0, 1]);
    }

    #[test]
    fn test_modulo_seed_shifts() {
        let oracle = ModuloPlacement::new(1);
        assert_eq!(oracle.place(7, 2, 5).unwrap(), vec![3, 4]);
    }

    #[test]
    fn test_modulo_full_domain() {
        let oracle = ModuloPlacement::new(0);
        let mut got = oracle.place(u64::MAX, 4, 4).unwrap();
        got.sort_unstable();
        assert_eq!(got, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_modulo_rejects_oversized_request() {
        let oracle = ModuloPlacement::new(0);
        assert!(oracle.place(1, 3, 2).is_err());
    }
}

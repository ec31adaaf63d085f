//! The placement oracle capability.
//!
//! An oracle maps `(object id, replica count, domain size)` to an ordered
//! list of distinct indices in `[0, domain)`. It is a pure function of its
//! inputs and the seed it was built with; the simulation relies on this to
//! re-query the same object against a server's device set.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::crush::CrushPlacement;
use crate::modulo::ModuloPlacement;
use crate::ring::RingPlacement;

/// Largest replica count a single query may request.
pub const MAX_REPLICATION: usize = 16;

/// Errors that can occur during placement.
#[derive(Debug, Error)]
pub enum PlacementError {
    /// The algorithm name is not one this crate implements.
    #[error("unsupported placement algorithm '{0}' (expected one of: static_modulo, ring, crush)")]
    UnknownAlgorithm(String),

    /// Not enough nodes for the requested replica count.
    #[error("not enough nodes: need {needed}, have {available}")]
    NotEnoughNodes {
        /// Number of distinct nodes requested.
        needed: usize,
        /// Size of the domain.
        available: usize,
    },

    /// More replicas requested than any query supports.
    #[error("replica count {requested} exceeds the maximum of {max}")]
    ReplicationTooHigh {
        /// Requested replica count.
        requested: usize,
        /// Supported maximum.
        max: usize,
    },

    /// The domain has no nodes at all.
    #[error("placement domain is empty")]
    EmptyDomain,

    /// Oracle parameters are out of range.
    #[error("invalid placement parameter: {0}")]
    InvalidParameter(String),
}

/// Deterministic placement function.
pub trait Placement: Send + Sync + fmt::Debug {
    /// The algorithm this oracle implements.
    fn algorithm(&self) -> PlacementAlgorithm;

    /// Fill `out` with `out.len()` distinct indices in `[0, domain)` for `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if `out.len()` distinct indices cannot be drawn from
    /// `domain` nodes.
    fn place_into(&self, id: u64, domain: usize, out: &mut [usize]) -> Result<(), PlacementError>;

    /// Compute `replicas` distinct indices in `[0, domain)` for `id`.
    ///
    /// # Errors
    ///
    /// See [`Placement::place_into`].
    fn place(&self, id: u64, replicas: usize, domain: usize) -> Result<Vec<usize>, PlacementError> {
        let mut out = vec![0; replicas];
        self.place_into(id, domain, &mut out)?;
        Ok(out)
    }
}

/// Check that `replicas` distinct indices can be drawn from `domain` nodes.
///
/// # Errors
///
/// Returns the matching [`PlacementError`] when the request is impossible.
pub fn check_request(replicas: usize, domain: usize) -> Result<(), PlacementError> {
    if domain == 0 {
        return Err(PlacementError::EmptyDomain);
    }
    if replicas > MAX_REPLICATION {
        return Err(PlacementError::ReplicationTooHigh {
            requested: replicas,
            max: MAX_REPLICATION,
        });
    }
    if replicas > domain {
        return Err(PlacementError::NotEnoughNodes { needed: replicas, available: domain });
    }
    Ok(())
}

/// Placement algorithm families, selected by name on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementAlgorithm {
    /// `id mod n` followed by consecutive indices.
    StaticModulo,
    /// Consistent-hash ring with virtual nodes.
    Ring,
    /// CRUSH straw2 selection over a flat bucket.
    Crush,
}

impl PlacementAlgorithm {
    /// All supported algorithms.
    pub const ALL: [Self; 3] = [Self::StaticModulo, Self::Ring, Self::Crush];

    /// Name as accepted on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StaticModulo => "static_modulo",
            Self::Ring => "ring",
            Self::Crush => "crush",
        }
    }

    /// Build an oracle for this algorithm.
    ///
    /// `virtual_nodes` is the number of ring points per physical node and is
    /// ignored by the other families. `seed` salts every hash.
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError::InvalidParameter`] if `virtual_nodes` is zero.
    pub fn build(self, virtual_nodes: usize, seed: u64) -> Result<Arc<dyn Placement>, PlacementError> {
        if virtual_nodes == 0 {
            return Err(PlacementError::InvalidParameter(
                "virtual node factor must be at least 1".to_string(),
            ));
        }
        Ok(match self {
            Self::StaticModulo => Arc::new(ModuloPlacement::new(seed)),
            Self::Ring => Arc::new(RingPlacement::new(virtual_nodes, seed)),
            Self::Crush => Arc::new(CrushPlacement::new(seed)),
        })
    }
}

impl fmt::Display for PlacementAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlacementAlgorithm {
    type Err = PlacementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|alg| alg.as_str() == s)
            .ok_or_else(|| PlacementError::UnknownAlgorithm(s.to_string()))
    }
}

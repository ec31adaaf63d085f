//! Failure impact analysis.
//!
//! Every object asks the oracle for `R + 1` candidates: the first `R` are
//! its replicas, the last is where a replacement would go. If the failed
//! server is one of the replicas, the spillover server receives one new
//! replica. The result is a histogram over all servers.
//!
//! Candidate lists and per-chunk partial histograms are computed in
//! parallel; the partials are merged in chunk order afterwards.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Instant;

use placebench_placement::Placement;
use serde::Serialize;
use tracing::info;

use crate::error::{Result, SimError};
use crate::parallel::{build_pool, map_chunks};
use crate::population::ObjectPopulation;

/// Replacement replicas per server after one server fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureHistogram {
    /// Index of the failed server.
    pub failed_server: usize,
    /// Objects analyzed.
    pub objects: usize,
    /// Replacement replicas routed to each server.
    pub counts: Vec<u64>,
}

impl FailureHistogram {
    /// Number of servers.
    #[must_use]
    pub fn servers(&self) -> usize {
        self.counts.len()
    }

    /// Objects that lost a replica.
    #[must_use]
    pub fn affected(&self) -> u64 {
        self.counts.iter().sum()
    }
}

/// Spillover server for one object, if `failed` holds one of its replicas.
///
/// Only the first `replication` entries count as replicas; the entry right
/// after them is the spillover. Scanning stops at the first match.
#[must_use]
pub fn spillover_target(candidates: &[usize], replication: usize, failed: usize) -> Option<usize> {
    let spillover = *candidates.get(replication)?;
    candidates[..replication].iter().any(|&c| c == failed).then_some(spillover)
}

/// Computes the failure histogram for a population.
#[derive(Debug, Clone)]
pub struct FailureAnalyzer {
    placement: Arc<dyn Placement>,
    replication: usize,
    workers: NonZeroUsize,
}

impl FailureAnalyzer {
    /// Create an analyzer for `replication` replicas per object.
    #[must_use]
    pub fn new(placement: Arc<dyn Placement>, replication: usize, workers: NonZeroUsize) -> Self {
        Self { placement, replication, workers }
    }

    /// Simulate the loss of server `failed` out of `servers`.
    ///
    /// The population must carry `replication + 1` slots per object; they
    /// are overwritten with the oracle's candidates.
    ///
    /// # Errors
    ///
    /// Fails if `failed` is not a valid server, if the slot count is wrong,
    /// if the oracle rejects the query, or if the worker pool cannot be
    /// started.
    pub fn analyze(
        &self,
        population: &mut ObjectPopulation,
        servers: usize,
        failed: usize,
    ) -> Result<FailureHistogram> {
        if failed >= servers {
            return Err(SimError::InvalidFailedServer { failed, servers });
        }
        let slots = self.replication + 1;
        if population.slots() != slots {
            return Err(SimError::SlotMismatch { expected: slots, actual: population.slots() });
        }

        let started = Instant::now();
        let replication = self.replication;
        let placement = self.placement.as_ref();
        let pool = build_pool(self.workers)?;
        let partials = map_chunks(&pool, population.objects_mut(), |chunk| {
            let mut counts = vec![0u64; servers];
            for object in chunk {
                placement.place_into(object.id, servers, &mut object.candidates)?;
                if let Some(target) = spillover_target(&object.candidates, replication, failed) {
                    counts[target] += 1;
                }
            }
            Ok(counts)
        })?;

        let mut counts = vec![0u64; servers];
        for partial in partials {
            for (total, n) in counts.iter_mut().zip(partial) {
                *total += n;
            }
        }

        let histogram = FailureHistogram { failed_server: failed, objects: population.len(), counts };
        info!(
            failed,
            servers,
            objects = histogram.objects,
            affected = histogram.affected(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Failure analysis finished"
        );
        Ok(histogram)
    }
}

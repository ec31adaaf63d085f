//! Simulation engine.
//!
//! A run has two phases:
//!
//! 1. **Decide** (parallel): every object asks the oracle for its `R` server
//!    candidates and for one device candidate within a server's device set.
//!    These queries only read the object id, so workers own disjoint chunks
//!    of the population and share nothing else.
//! 2. **Apply** (sequential): in object order, each replica's raw candidate
//!    is refined by the windowed selector against the live topology, the
//!    chosen server and device are charged one block, and the transfer time
//!    is fed to the [`EpochRing`].
//!
//! Because every topology mutation happens in the apply phase, the final
//! state does not depend on the worker count or on scheduling.
//!
//! Refinement can move two replicas of the same object onto one server; the
//! engine does not enforce distinct servers after the selector runs.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use placebench_core::{BlockSize, Window};
use placebench_placement::Placement;
use serde::Serialize;
use tracing::{debug, info};

use crate::epoch::EpochRing;
use crate::error::{Result, SimError};
use crate::parallel::{build_pool, map_chunks};
use crate::population::{ObjectPopulation, ReplicaSite};
use crate::selector::WindowedSelector;
use crate::topology::Topology;

/// Parameters of one benchmark run.
#[derive(Debug, Clone, Copy)]
pub struct SimulationConfig {
    /// Replicas per object.
    pub replication: usize,
    /// Selector window.
    pub window: Window,
    /// Size of every write.
    pub block: BlockSize,
    /// Worker threads for the decide phase; also the epoch ring width.
    pub threads: NonZeroUsize,
}

/// What a run produced besides the mutated topology.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationOutcome {
    /// (object, replica) pairs placed.
    pub pairs: u64,
    /// Estimated distribution time in seconds, from the epoch ring.
    pub distribution_time: f64,
    /// Completed epoch rounds.
    pub folds: u64,
    /// Wall-clock time of the whole run.
    pub elapsed: Duration,
}

/// Replays an object population through the oracle and the selector.
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    config: SimulationConfig,
    placement: Arc<dyn Placement>,
}

impl SimulationEngine {
    /// Create an engine.
    #[must_use]
    pub fn new(config: SimulationConfig, placement: Arc<dyn Placement>) -> Self {
        Self { config, placement }
    }

    /// Place every object of `population` onto `topology`.
    ///
    /// On return each object's `sites` holds one entry per replica and the
    /// topology's load fields reflect every write.
    ///
    /// # Errors
    ///
    /// Fails if the population's slot count differs from the replication
    /// factor, if the oracle rejects a query (for example more replicas than
    /// servers), or if the worker pool cannot be started.
    pub fn run(
        &self,
        topology: &mut Topology,
        population: &mut ObjectPopulation,
    ) -> Result<SimulationOutcome> {
        let replication = self.config.replication;
        if population.slots() != replication {
            return Err(SimError::SlotMismatch { expected: replication, actual: population.slots() });
        }

        let started = Instant::now();
        self.decide(topology, population)?;
        debug!(
            objects = population.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Computed oracle candidates"
        );

        let (pairs, ring) = self.apply(topology, population);
        let elapsed = started.elapsed();

        info!(
            objects = population.len(),
            pairs,
            folds = ring.folds(),
            distribution_time = ring.total(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Simulation finished"
        );
        Ok(SimulationOutcome {
            pairs,
            distribution_time: ring.total(),
            folds: ring.folds(),
            elapsed,
        })
    }

    fn decide(&self, topology: &Topology, population: &mut ObjectPopulation) -> Result<()> {
        let servers = topology.len();
        let devices = topology.devices_per_server();
        let placement = self.placement.as_ref();

        let pool = build_pool(self.config.threads)?;
        map_chunks(&pool, population.objects_mut(), |chunk| {
            let mut device = [0usize];
            for object in chunk {
                placement.place_into(object.id, servers, &mut object.candidates)?;
                // Every server has the same device count, so one query serves
                // whichever server the selector settles on.
                placement.place_into(object.id, devices, &mut device)?;
                object.device_candidate = device[0];
                object.sites.clear();
            }
            Ok(())
        })?;
        Ok(())
    }

    fn apply(&self, topology: &mut Topology, population: &mut ObjectPopulation) -> (u64, EpochRing) {
        let SimulationConfig { replication, window, block, threads } = self.config;
        let selector = WindowedSelector::new(window, block);
        let mut ring = EpochRing::new(threads);
        let mut sequence = 0u64;

        for object in population.objects_mut() {
            object.sites.reserve(replication);
            for &primary in &object.candidates {
                let server = selector.select(topology.servers(), primary).unwrap_or(primary);
                topology.record_server_write(server, block);

                let start = object.device_candidate;
                let device =
                    selector.select(&topology.servers()[server].devices, start).unwrap_or(start);
                let cost = topology.record_device_write(server, device, block);

                ring.record(sequence, cost);
                sequence += 1;
                object.sites.push(ReplicaSite { server, device });
            }
        }
        (sequence, ring)
    }
}

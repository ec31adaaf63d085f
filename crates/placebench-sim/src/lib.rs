//! Placement simulation for heterogeneous storage fleets.
//!
//! This crate provides:
//! - A topology model of servers owning devices sampled from a catalog
//! - A synthetic object population
//! - The windowed selector that refines an oracle's candidate under live load
//! - The simulation engine replaying the population through oracle and selector
//! - The failure impact analyzer for a single lost server
//! - Text and JSON reports
//!
//! # Example
//!
//! ```
//! use std::num::NonZeroUsize;
//!
//! use placebench_core::{BlockSize, DeviceCatalog, Window};
//! use placebench_placement::PlacementAlgorithm;
//! use placebench_sim::{ObjectPopulation, SimulationConfig, SimulationEngine, Topology};
//!
//! let mut topology = Topology::generate(6, 4, &DeviceCatalog::default(), 123)?;
//! let mut population = ObjectPopulation::random(100, 3, 8_675_309);
//! let config = SimulationConfig {
//!     replication: 3,
//!     window: Window::new(4)?,
//!     block: BlockSize::from_kb(4)?,
//!     threads: NonZeroUsize::new(2).unwrap(),
//! };
//! let engine = SimulationEngine::new(config, PlacementAlgorithm::Ring.build(8, 0)?);
//! let outcome = engine.run(&mut topology, &mut population)?;
//! assert_eq!(outcome.pairs, 300);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod decluster;
pub mod engine;
pub mod epoch;
pub mod error;
mod parallel;
pub mod population;
pub mod report;
pub mod selector;
pub mod topology;

pub use decluster::{spillover_target, FailureAnalyzer, FailureHistogram};
pub use engine::{SimulationConfig, SimulationEngine, SimulationOutcome};
pub use epoch::EpochRing;
pub use error::{Result, SimError};
pub use population::{ObjectPopulation, ObjectRecord, ReplicaSite};
pub use report::{BenchmarkReport, DeclusterReport, DeviceSummary, ServerSummary, Totals};
pub use selector::{LoadProfile, WindowedSelector};
pub use topology::{Device, Server, Topology};

//! Deterministic placement oracles for placebench.
//!
//! A placement oracle maps an object identifier to an ordered list of
//! distinct node indices. The simulation treats it as a black box: it only
//! relies on the contract that the answer is a pure function of
//! `(id, replica count, domain size, seed)`.
//!
//! # Algorithms
//!
//! | Name | Type | Notes |
//! |------|------|-------|
//! | `static_modulo` | [`ModuloPlacement`] | `id mod n`, then consecutive indices |
//! | `ring` | [`RingPlacement`] | consistent hashing with virtual nodes |
//! | `crush` | [`CrushPlacement`] | straw2 over a flat, equally weighted bucket |
//!
//! # Usage
//!
//! ```
//! use placebench_placement::{Placement, PlacementAlgorithm};
//!
//! let oracle = "ring".parse::<PlacementAlgorithm>().unwrap().build(32, 0).unwrap();
//!
//! // Three distinct servers out of ten for object 42
//! let servers = oracle.place(42, 3, 10).unwrap();
//! assert_eq!(servers.len(), 3);
//!
//! // Same question, same answer
//! assert_eq!(servers, oracle.place(42, 3, 10).unwrap());
//! ```

#![warn(missing_docs)]

pub mod crush;
pub mod hash;
pub mod modulo;
pub mod oracle;
pub mod ring;

pub use crush::CrushPlacement;
pub use hash::placement_hash;
pub use modulo::ModuloPlacement;
pub use oracle::{check_request, Placement, PlacementAlgorithm, PlacementError, MAX_REPLICATION};
pub use ring::RingPlacement;

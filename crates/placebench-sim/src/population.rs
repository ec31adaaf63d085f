//! Synthetic object population.
//!
//! Objects are identified by a 64-bit id drawn uniformly from the full id
//! space. Each object carries room for the oracle's candidates and, after a
//! benchmark run, the concrete server and device each replica landed on.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

/// Final location of one replica.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReplicaSite {
    /// Server index.
    pub server: usize,
    /// Device index within the server.
    pub device: usize,
}

/// One simulated object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRecord {
    /// Object identifier.
    pub id: u64,
    /// Server candidates returned by the oracle.
    pub candidates: Vec<usize>,
    /// Device candidate returned by the oracle for the per-server device set.
    pub device_candidate: usize,
    /// Where each replica was finally placed. Empty until a benchmark run.
    pub sites: Vec<ReplicaSite>,
}

/// A fixed set of objects built once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectPopulation {
    objects: Vec<ObjectRecord>,
    slots: usize,
}

impl ObjectPopulation {
    /// Generate `count` objects with `slots` candidate slots each.
    #[must_use]
    pub fn random(count: usize, slots: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let objects = (0..count)
            .map(|_| ObjectRecord {
                id: rng.gen(),
                candidates: vec![0; slots],
                device_candidate: 0,
                sites: Vec::new(),
            })
            .collect();
        Self { objects, slots }
    }

    /// Build a population from explicit identifiers.
    #[cfg(test)]
    pub(crate) fn from_ids(ids: impl IntoIterator<Item = u64>, slots: usize) -> Self {
        let objects = ids
            .into_iter()
            .map(|id| ObjectRecord {
                id,
                candidates: vec![0; slots],
                device_candidate: 0,
                sites: Vec::new(),
            })
            .collect();
        Self { objects, slots }
    }

    /// Number of objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns true if the population is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Candidate slots per object.
    #[must_use]
    pub fn slots(&self) -> usize {
        self.slots
    }

    /// Objects in generation order.
    #[must_use]
    pub fn objects(&self) -> &[ObjectRecord] {
        &self.objects
    }

    pub(crate) fn objects_mut(&mut self) -> &mut [ObjectRecord] {
        &mut self.objects
    }

    /// Approximate heap footprint in bytes.
    #[must_use]
    pub fn footprint_bytes(&self) -> usize {
        let per_object = std::mem::size_of::<ObjectRecord>()
            + self.slots * std::mem::size_of::<usize>()
            + self.slots * std::mem::size_of::<ReplicaSite>();
        self.objects.len() * per_object
    }
}

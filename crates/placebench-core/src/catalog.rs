// Copyright 2024 The Placebench Authors
// SPDX-License-Identifier: Apache-2.0

//! Device catalog.
//!
//! The catalog is the immutable table of device classes a topology is drawn
//! from. Each tier is identified by its latency, so latencies must be
//! pairwise distinct: the simulation attributes writes to tiers by matching
//! a device's latency against this table.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One class of storage device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceTier {
    /// Short name used in reports (e.g. `hdd`).
    pub name: String,
    /// Raw capacity in bytes.
    pub capacity: f64,
    /// Sustained bandwidth in bytes per second.
    pub bandwidth: f64,
    /// Access latency in microseconds. Doubles as the tier fingerprint.
    pub latency_us: f64,
    /// Endurance rating (write cycles).
    pub endurance: u64,
}

impl DeviceTier {
    /// Creates a new tier.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        capacity: f64,
        bandwidth: f64,
        latency_us: f64,
        endurance: u64,
    ) -> Self {
        Self { name: name.into(), capacity, bandwidth, latency_us, endurance }
    }

    /// Spinning disk: large and slow.
    #[must_use]
    pub fn hdd() -> Self {
        Self::new("hdd", 1_000_000_000_000.0, 96_000_000.0, 4200.0, 1 << 50)
    }

    /// SATA flash.
    #[must_use]
    pub fn sata_ssd() -> Self {
        Self::new("sata_ssd", 200_000_000_000.0, 228_000_000.0, 60.0, 1 << 20)
    }

    /// NVMe flash: small and fast.
    #[must_use]
    pub fn nvme() -> Self {
        Self::new("nvme", 32_000_000_000.0, 2_100_000_000.0, 12.0, 1 << 40)
    }
}

/// Immutable table of device tiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceCatalog {
    /// Tiers in sampling order.
    pub tiers: Vec<DeviceTier>,
}

impl Default for DeviceCatalog {
    fn default() -> Self {
        Self { tiers: vec![DeviceTier::hdd(), DeviceTier::sata_ssd(), DeviceTier::nvme()] }
    }
}

impl DeviceCatalog {
    /// Builds a catalog from explicit tiers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the tiers fail [`DeviceCatalog::validate`].
    pub fn new(tiers: Vec<DeviceTier>) -> Result<Self> {
        let catalog = Self { tiers };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Checks that the catalog can drive a simulation.
    ///
    /// Capacity, bandwidth and latency must be positive: a zero in any of
    /// them makes the selector's normalization degenerate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.tiers.is_empty() {
            return Err(Error::config("device catalog must contain at least one tier"));
        }
        for (idx, tier) in self.tiers.iter().enumerate() {
            let positive = [
                ("capacity", tier.capacity),
                ("bandwidth", tier.bandwidth),
                ("latency_us", tier.latency_us),
            ];
            for (field, value) in positive {
                if !(value.is_finite() && value > 0.0) {
                    return Err(Error::config(format!(
                        "tier {idx} ({}): {field} must be a positive number, got {value}",
                        tier.name
                    )));
                }
            }
            if self.tiers[..idx].iter().any(|other| other.latency_us == tier.latency_us) {
                return Err(Error::config(format!(
                    "tier {idx} ({}): latency {} is not unique",
                    tier.name, tier.latency_us
                )));
            }
        }
        Ok(())
    }

    /// Number of tiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    /// Returns true if the catalog has no tiers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Returns the tier at `idx`.
    #[must_use]
    pub fn tier(&self, idx: usize) -> Option<&DeviceTier> {
        self.tiers.get(idx)
    }

    /// Finds the tier whose latency exactly matches `latency_us`.
    #[must_use]
    pub fn tier_by_latency(&self, latency_us: f64) -> Option<usize> {
        self.tiers.iter().position(|tier| tier.latency_us == latency_us)
    }
}

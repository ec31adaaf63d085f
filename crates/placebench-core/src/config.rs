// Copyright 2024 The Placebench Authors
// SPDX-License-Identifier: Apache-2.0

//! Configuration management for placebench.
//!
//! Everything that used to be a compiled-in constant (the device catalog and
//! the generator seeds) lives here so runs can be reproduced or varied from a
//! TOML file without rebuilding.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::DeviceCatalog;

/// Top-level configuration shared by both tools.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Device catalog used to build the topology.
    pub catalog: DeviceCatalog,
    /// Seeds for the reproducible generators.
    pub seeds: SeedConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(crate::Error::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string cannot be parsed or validated.
    pub fn parse(content: &str) -> crate::Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Config`] if the catalog is unusable.
    pub fn validate(&self) -> crate::Result<()> {
        self.catalog.validate()
    }
}

/// Seeds for every pseudo-random generator in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Seed for device tier sampling.
    pub topology: u64,
    /// Seed for object identifier generation.
    pub objects: u64,
    /// Salt mixed into every placement hash.
    pub placement: u64,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self { topology: 123, objects: 8_675_309, placement: 0 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format.
    #[default]
    Pretty,
    /// JSON format.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    pub level: String,
    /// Log output format.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: LogFormat::Pretty }
    }
}

//! Core types and utilities for placebench.
//!
//! This crate provides the building blocks shared by the simulation and the
//! command line tools:
//! - Configuration management (TOML)
//! - Error types
//! - The device catalog a topology is sampled from
//! - Value types for block sizes and selector windows

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod catalog;
pub mod config;
pub mod error;
pub mod types;

pub use catalog::{DeviceCatalog, DeviceTier};
pub use config::{Config, LogFormat, LoggingConfig, SeedConfig};
pub use error::{Error, Result};
pub use types::{BlockSize, Window, BYTES_PER_KB, MIN_WINDOW, WORKLOAD_DIVISOR};

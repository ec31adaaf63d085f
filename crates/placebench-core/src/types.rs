// Copyright 2024 The Placebench Authors
// SPDX-License-Identifier: Apache-2.0

//! Small value types used throughout placebench.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Bytes per kilobyte as used by the block size flag (decimal, not KiB).
pub const BYTES_PER_KB: u64 = 1000;

/// Divisor converting written bytes into workload units.
///
/// Workload is a load proxy, not a bandwidth: every write adds
/// `block_bytes / WORKLOAD_DIVISOR` units to the target server and device.
pub const WORKLOAD_DIVISOR: f64 = 10_000.0;

/// Smallest window the selector accepts.
///
/// The score normalizes against the first three window slots, so anything
/// smaller has no defined score.
pub const MIN_WINDOW: usize = 3;

/// Fixed size of every simulated write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockSize(u64);

impl BlockSize {
    /// Creates a block size from a kilobyte count.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `kb` is zero or the byte count
    /// does not fit in a `u64`.
    pub fn from_kb(kb: u64) -> Result<Self> {
        if kb == 0 {
            return Err(Error::invalid_argument("block size must be at least 1 KB"));
        }
        kb.checked_mul(BYTES_PER_KB).map(Self).ok_or_else(|| {
            Error::invalid_argument(format!("block size of {kb} KB overflows the byte count"))
        })
    }

    /// Returns the block size in bytes.
    #[must_use]
    pub const fn bytes(self) -> u64 {
        self.0
    }

    /// Returns the block size in bytes as a float, for capacity arithmetic.
    #[must_use]
    pub fn as_f64(self) -> f64 {
        self.0 as f64
    }

    /// Returns the workload units one write of this size adds.
    #[must_use]
    pub fn workload_units(self) -> f64 {
        self.as_f64() / WORKLOAD_DIVISOR
    }
}

impl std::fmt::Display for BlockSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} bytes", self.0)
    }
}

/// Number of consecutive candidates the selector considers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct Window(usize);

impl Window {
    /// Creates a window, rejecting sizes below [`MIN_WINDOW`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `size < MIN_WINDOW`.
    pub fn new(size: usize) -> Result<Self> {
        if size < MIN_WINDOW {
            return Err(Error::invalid_argument(format!(
                "window size must be at least {MIN_WINDOW}, got {size}"
            )));
        }
        Ok(Self(size))
    }

    /// Returns the window size.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl TryFrom<usize> for Window {
    type Error = Error;

    fn try_from(size: usize) -> Result<Self> {
        Self::new(size)
    }
}

impl From<Window> for usize {
    fn from(window: Window) -> Self {
        window.0
    }
}

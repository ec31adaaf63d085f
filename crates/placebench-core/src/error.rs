// Copyright 2024 The Placebench Authors
// SPDX-License-Identifier: Apache-2.0

//! Error types shared by the placebench crates.

use thiserror::Error;

/// A specialized `Result` type for placebench setup operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while configuring a run.
///
/// Every variant is fatal: the tools validate everything up front and never
/// start a simulation with a partially valid configuration.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file could not be parsed or failed validation.
    #[error("configuration error: {0}")]
    Config(String),

    /// A command line or API argument is out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// I/O error while reading configuration.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Creates an invalid argument error.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

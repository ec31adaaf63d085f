//! Command line front end for the placement benchmark and the decluster check.
//!
//! The binaries are thin: they parse and validate flags, then hand over to
//! [`run`]. Everything else lives here so it can be exercised from tests.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod run;

use std::path::Path;

use anyhow::{Context, Result};
use placebench_core::{Config, LogFormat, LoggingConfig};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Load configuration from `path`, or the defaults if no path is given.
///
/// # Errors
///
/// Returns an error if the file cannot be read or fails validation.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => Ok(Config::default()),
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Logs go to stderr;
/// stdout is reserved for the report.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.level));

    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let installed = match config.format {
        LogFormat::Json => {
            tracing_subscriber::registry().with(filter).with(fmt_layer.json()).try_init()
        }
        LogFormat::Pretty => tracing_subscriber::registry().with(filter).with(fmt_layer).try_init(),
    };
    installed.context("Failed to initialize logging")
}

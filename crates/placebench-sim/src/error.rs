//! Error types for simulation runs.

use placebench_placement::PlacementError;
use thiserror::Error;

/// Result type for simulation operations.
pub type Result<T> = std::result::Result<T, SimError>;

/// Errors that abort a simulation or failure analysis.
#[derive(Debug, Error)]
pub enum SimError {
    /// Invalid configuration or argument.
    #[error(transparent)]
    Core(#[from] placebench_core::Error),

    /// The placement oracle rejected a query.
    #[error("placement error: {0}")]
    Placement(#[from] PlacementError),

    /// The population was generated for a different replica layout.
    #[error("population carries {actual} candidate slots per object, expected {expected}")]
    SlotMismatch {
        /// Slots the engine needs.
        expected: usize,
        /// Slots the population has.
        actual: usize,
    },

    /// The topology cannot host the requested run.
    #[error("invalid topology: {0}")]
    InvalidTopology(String),

    /// The server chosen to fail does not exist.
    #[error("failed server {failed} is out of range for {servers} servers")]
    InvalidFailedServer {
        /// Requested server index.
        failed: usize,
        /// Number of servers.
        servers: usize,
    },

    /// The worker pool could not be started.
    #[error("failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

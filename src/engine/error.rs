//! Error types for group updates and their configuration.
//!
//! This module declares the errors surfaced by the update executor, the
//! entity-indexed storage written by vector phases, and the configuration
//! layer.
//!
//! ## Taxonomy
//! * **Out-of-range identifiers:** an entity identifier addresses storage
//!   outside its bounds. Detected by the storage accessed from inside a
//!   phase and propagated unchanged; fatal to the current pass.
//! * **Duplicate identifiers:** a group index lists the same entity twice.
//!   Checked as a precondition before any phase runs, according to the
//!   configured [`DuplicatePolicy`](crate::engine::config::DuplicatePolicy).
//! * **Phase failures:** free-form errors raised by phase bodies.
//! * **Setup failures:** worker-pool construction and configuration errors.
//!
//! ## Propagation
//! The executor never catches or recovers from phase errors. The first error
//! aborts the remaining iterations of the pass and is returned to the caller.
//! Writes already performed by completed iterations are not rolled back.
//!
//! ## Example
//! ```ignore
//! match updater.execute(scalar, &vector, &group) {
//!     Ok(()) => {}
//!     Err(ExecutionError::OutOfRangeIdentifier { entity, len }) => {
//!         eprintln!("entity {entity} is outside storage of length {len}");
//!     }
//!     Err(e) => return Err(e),
//! }
//! ```

use thiserror::Error;

use crate::engine::types::{EntityID, Position};


/// Result alias used by the executor, phases and storage.
pub type ExecutionResult<T> = Result<T, ExecutionError>;

/// Result alias used by configuration parsing.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while executing a group update pass.

#[derive(Debug, Error)]
pub enum ExecutionError {
    /// An entity identifier addressed storage outside its valid bounds.
    #[error("entity identifier {entity} out of range (storage length {len})")]
    OutOfRangeIdentifier {
        /// Offending identifier.
        entity: EntityID,

        /// Length of the storage that was addressed.
        len: usize,
    },

    /// The same entity identifier appears twice in a group index.
    #[error("entity identifier {entity} appears at positions {first} and {second} of the group index")]
    DuplicateIdentifier {
        /// Repeated identifier.
        entity: EntityID,

        /// Position of the first occurrence.
        first: Position,

        /// Position of the repeated occurrence.
        second: Position,
    },

    /// A phase body reported a failure of its own.
    #[error("{phase} phase failed: {message}")]
    Phase {
        /// Name of the failing phase.
        phase: String,

        /// Human-readable failure description.
        message: String,
    },

    /// The fixed-size worker pool could not be created.
    #[error("failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    /// The updater configuration was rejected.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

impl ExecutionError {
    /// Builds a [`ExecutionError::Phase`] error.
    pub fn phase(phase: impl Into<String>, message: impl Into<String>) -> Self {
        ExecutionError::Phase {
            phase: phase.into(),
            message: message.into(),
        }
    }
}

/// Errors raised while parsing or validating an update configuration.

#[derive(Debug, Error)]
pub enum ConfigError {
    /// An execution mode name was not recognised.
    #[error("unknown execution mode `{0}` (expected `sequential` or `parallel-static`)")]
    UnknownMode(String),

    /// A duplicate policy name was not recognised.
    #[error("unknown duplicate policy `{0}` (expected `always`, `parallel-only` or `never`)")]
    UnknownDuplicatePolicy(String),

    /// The worker count was zero or not a number.
    #[error("invalid worker count `{0}`")]
    InvalidWorkers(String),

    /// A JSON configuration document could not be decoded.
    #[error("malformed configuration document: {0}")]
    Json(#[from] serde_json::Error),
}

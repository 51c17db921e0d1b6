//! Error types for the interval branch-and-bound minimizer.
//!
//! The search engine itself cannot fail: every error here is raised at an
//! entry point (parameter validation, registry lookup, worker topology) or by
//! the message layer that connects the workers.

use thiserror::Error;

/// Errors that can occur while setting up or coordinating a search.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    #[error("Invalid threshold {0}: must be finite and strictly positive")]
    InvalidThreshold(f64),

    #[error("Invalid bounds in {axis} dimension: [{lo}, {hi}]")]
    InvalidBounds { axis: char, lo: f64, hi: f64 },

    #[error("Unknown function '{name}' (available: {})", available.join(", "))]
    UnknownFunction { name: String, available: Vec<String> },

    #[error("Topology mismatch: expected exactly {expected} workers, found {found}")]
    TopologyMismatch { expected: usize, found: usize },

    #[error("Communication failure: {0}")]
    Communication(String),

    #[error("Worker pool could not be started: {0}")]
    ThreadPool(String),
}

impl SearchError {
    /// Returns true for errors caused by the caller's run parameters, as
    /// opposed to failures of the worker infrastructure.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidThreshold(_)
                | Self::InvalidBounds { .. }
                | Self::UnknownFunction { .. }
                | Self::TopologyMismatch { .. }
        )
    }
}

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

//! Error types for the PRX simulator workspace.
//!
//! Simulator commands are total and never fail. Errors only come from
//! construction-time validation, configuration loading, and shared-state
//! access from multi-threaded hosts.

use thiserror::Error;

/// The unified error type for the PRX crates.
#[derive(Debug, Error)]
pub enum PrxError {
    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// An action template failed validation (empty outcome list, bad latency range, ...).
    #[error("invalid action template '{action_type}': {reason}")]
    InvalidTemplate { action_type: String, reason: String },

    /// A scenario failed validation (no agents, no templates, ...).
    #[error("invalid scenario '{label}': {reason}")]
    InvalidScenario { label: String, reason: String },

    /// The shared simulator state could not be accessed.
    ///
    /// Only raised by the mutex-guarded handle when the lock is poisoned.
    #[error("simulator state unavailable: {reason}")]
    StateUnavailable { reason: String },
}

/// Convenience alias used throughout the PRX crates.
pub type PrxResult<T> = Result<T, PrxError>;

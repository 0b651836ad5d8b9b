//! Core error types for studymon-core.
//!
//! Every failure in this crate is recoverable: the timer reverts to its
//! previous state, the display clamps, or the aggregation substitutes a
//! placeholder. These enums only describe what went wrong so the
//! presentation layer can surface it.

use std::path::PathBuf;
use thiserror::Error;

use crate::timer::TimerState;

/// Core error type for studymon-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Study service errors
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    /// Timer state machine errors
    #[error("Timer error: {0}")]
    Timer(#[from] TimerError),

    /// Evolution announcement errors
    #[error("Announcement error: {0}")]
    Announcement(#[from] AnnouncementError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors talking to the study service.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The request never produced a response (connection refused, DNS, ...)
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("Service returned {status}: {message}")]
    Status { status: u16, message: String },

    /// A route could not be joined onto the configured base address
    #[error("Invalid service URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Timer state machine errors.
#[derive(Error, Debug)]
pub enum TimerError {
    /// Start was requested with no topic selected
    #[error("Please select a subject first")]
    NoTopicSelected,

    /// Topic selection changed while a session is in flight
    #[error("Subject selection is locked while the timer is {state}")]
    SelectionLocked { state: TimerState },

    /// The requested transition is not offered in the current state
    #[error("Cannot {action} while the timer is {state}")]
    InvalidTransition {
        action: &'static str,
        state: TimerState,
    },

    /// Begin session request failed; the timer stays idle
    #[error("Failed to start timer: {0}")]
    StartFailed(#[source] ServiceError),

    /// End session request failed; the timer keeps its elapsed time
    #[error("Failed to save session: {0}")]
    StopFailed(#[source] ServiceError),
}

/// Evolution announcement errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AnnouncementError {
    /// Another announcement has not been dismissed yet
    #[error("An evolution announcement is already showing")]
    Busy,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration tree
    #[error("Unknown config key: {0}")]
    UnknownKey(String),

    /// The configuration directory could not be created
    #[error("Cannot prepare data directory {path}: {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_save_keeps_service_detail() {
        let err: CoreError = TimerError::StopFailed(ServiceError::Status {
            status: 500,
            message: "database locked".into(),
        })
        .into();
        assert_eq!(
            err.to_string(),
            "Timer error: Failed to save session: Service returned 500: database locked"
        );
        assert!(matches!(err, CoreError::Timer(TimerError::StopFailed(_))));
    }
}

//! Error types for publisher operations.

use herald_models::EventName;
use thiserror::Error;

/// Errors that can occur while managing a publisher's listeners.
///
/// Failures raised by listeners during a broadcast are not represented
/// here; they reach the broadcaster unchanged.
#[derive(Error, Debug)]
pub enum PublisherError {
    /// Listener is already subscribed to this publisher.
    #[error("listener {0} is already subscribed")]
    AlreadyRegistered(String),

    /// Listener is not subscribed to this publisher.
    #[error("listener {0} is not subscribed")]
    NotRegistered(String),

    /// Listener cannot receive events.
    #[error("listener {0} does not have an event handler")]
    NoEventHandler(String),

    /// `on` was called without a callback.
    #[error("must pass a callback to subscribe to {0}")]
    MissingCallback(EventName),

    /// Lock poisoned (thread panicked while holding lock).
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),

    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Configuration file could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for publisher operations.
pub type Result<T> = std::result::Result<T, PublisherError>;

use thiserror::Error;

/// Demo shell error types
///
/// SDK outcomes are not errors here; they travel as [`crate::TrackingStatus`].
#[derive(Error, Debug)]
pub enum DemoError {
    #[error("Track once already in flight")]
    TrackInFlight,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid scenario: {0}")]
    Scenario(String),

    #[error("SDK worker unavailable: {0}")]
    WorkerUnavailable(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for shell operations
pub type DemoResult<T> = Result<T, DemoError>;

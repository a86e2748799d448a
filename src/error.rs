//! Error types for grid-localizer

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, LocalizeError>;

/// Errors raised by the localization crate.
///
/// Running out of disambiguating moves is not an error; it is reported as
/// [`Outcome::Stuck`](crate::report::Outcome::Stuck) in the run report.
#[derive(Debug, Error)]
pub enum LocalizeError {
    /// Caller passed a value the geometry layer cannot interpret
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Start pose outside the map, on a wall, or no open cell to pick from
    #[error("Invalid pose: {0}")]
    InvalidPose(String),

    /// Map text could not be turned into a rectangular grid
    #[error("Map format error: {0}")]
    MapFormat(String),

    /// Configuration rejected by validation
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

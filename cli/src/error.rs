//! Error handling for the cropstage command line tool

use cropstage_shared::PhenologyError;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Input errors
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Phenology(#[from] PhenologyError),

    // External service errors
    #[error("Weather service error: {0}")]
    WeatherService(String),

    #[error("Configuration error: {0}")]
    Configuration(#[from] config::ConfigError),

    // Export errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

/// Result type alias for commands
pub type AppResult<T> = Result<T, AppError>;

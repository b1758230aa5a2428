//! Error types for the phenology core

use thiserror::Error;

/// Errors raised while building crop tables or seasons
#[derive(Error, Debug)]
pub enum PhenologyError {
    #[error("Unsupported crop_id: {0}")]
    UnknownCrop(String),

    #[error("Weather series has the wrong input type: {0}")]
    WrongInputType(String),

    #[error("Invalid parameters for crop {crop_id}: {reason}")]
    InvalidCropParameters { crop_id: String, reason: String },

    #[error("Crop table format error: {0}")]
    CropTableFormat(#[from] serde_json::Error),
}

/// Result type alias for the phenology core
pub type PhenologyResult<T> = Result<T, PhenologyError>;

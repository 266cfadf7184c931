//! Error types for leptonica-region

use thiserror::Error;

/// Errors that can occur during extrema detection, seeding and flooding
#[derive(Debug, Error)]
pub enum RegionError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] leptonica_core::Error),

    /// The image cannot be used as an intensity surface
    #[error("invalid surface: {0}")]
    InvalidSurface(String),

    /// Invalid seed position
    #[error("invalid seed position: ({x}, {y})")]
    InvalidSeed { x: u32, y: u32 },

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// Results were queried before flooding completed
    #[error("watershed results are not available before apply() completes")]
    NotReady,
}

/// Result type for region operations
pub type RegionResult<T> = Result<T, RegionError>;

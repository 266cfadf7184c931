//! Error types for leptonica-core
//!
//! # See also
//!
//! C Leptonica reports failures through `L_ERROR` and integer return codes;
//! here every fallible call returns [`Result`].

use thiserror::Error;

/// Errors raised by the image containers and the priority heap
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    #[error("invalid pixel depth: {0} bpp")]
    InvalidDepth(u32),

    /// A colormap was attached to an image deeper than 8 bpp
    #[error("colormap not allowed for depth {0} bpp")]
    ColormapNotAllowed(u32),

    #[error("index out of bounds: {index} >= {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Two images that must share a size do not
    #[error("dimension mismatch: expected {}x{}, got {}x{}", .expected.0, .expected.1, .actual.0, .actual.1)]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// `remove` was called on a heap with no items
    #[error("heap is empty")]
    EmptyHeap,

    /// Failure writing a debug dump
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;

//! Leptonica Core - Basic data structures for image segmentation
//!
//! This crate provides the fundamental data structures used by the
//! watershed segmentation crates:
//!
//! - [`Pix`] / [`PixMut`] - The main image container (immutable / mutable)
//! - [`Heap`] - Keyed priority queue with stable ordering of equal keys
//! - [`Box`] / [`Boxa`] - Rectangle regions
//! - [`Numa`] - Numeric arrays
//! - [`Pixa`] - Arrays of images
//! - [`PixColormap`] - Color palette for indexed images
//!
//! # See also
//!
//! C Leptonica: `pix.h`, `heap.h`, `environ.h` (struct definitions)

pub mod box_;
pub mod colormap;
pub mod error;
pub mod heap;
pub mod numa;
pub mod pix;
pub mod pixa;

pub use box_::{Box, Boxa};
pub use colormap::{PixColormap, RgbaQuad};
pub use error::{Error, Result};
pub use heap::{Heap, HeapDirection, HeapItem};
pub use numa::Numa;
pub use pix::{InitColor, Pix, PixMut, PixelDepth};
pub use pixa::Pixa;

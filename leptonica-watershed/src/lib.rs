//! Leptonica watershed - Seeded watershed segmentation for Rust
//!
//! Builds on the [Leptonica](http://www.leptonica.org/) image containers to
//! partition a grayscale intensity surface into catchment basins.
//!
//! # Overview
//!
//! - Image containers and the priority heap from `leptonica-core`
//! - Local extrema, seed generation, flooding and rendering in [`region`]
//!
//! # Example
//!
//! ```
//! use leptonica_watershed::{Pix, PixelDepth};
//! use leptonica_watershed::region::{WatershedOptions, render_colors, watershed_segmentation};
//!
//! // A V-shaped valley opening on both sides of a ridge at x = 8
//! let mut pm = Pix::new(17, 9, PixelDepth::Bit8).unwrap().to_mut();
//! for y in 0..9u32 {
//!     for x in 0..17u32 {
//!         let d = x.abs_diff(4).min(x.abs_diff(12)) + y.abs_diff(4);
//!         pm.set_pixel(x, y, 10 * d).unwrap();
//!     }
//! }
//! let surface: Pix = pm.into();
//!
//! let ws = watershed_segmentation(&surface, &WatershedOptions::default()).unwrap();
//! assert_eq!(ws.basin_count().unwrap(), 2);
//!
//! let colors = render_colors(&ws, 1).unwrap();
//! assert!(colors.has_colormap());
//! ```

// Re-export core types (primary data structures used everywhere)
pub use leptonica_core::*;

// Re-export the segmentation crate as a module to avoid name conflicts
pub use leptonica_region as region;

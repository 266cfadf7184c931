//! leptonica-region - Watershed segmentation for Leptonica
//!
//! This crate provides the watershed segmentation pipeline:
//!
//! - **Extrema detection** - Regional minima and maxima with a depth filter
//! - **Seed generation** - One labelled seed per minimum plateau
//! - **Watershed flooding** - Priority-ordered region growing with boundaries
//! - **Rendering** - Level fill and random-colour views of the basins
//!
//! # Examples
//!
//! ```
//! use leptonica_core::{Pix, PixelDepth};
//! use leptonica_region::{ConnectivityType, WatershedOptions, watershed_segmentation};
//!
//! // Two pits in a flat field
//! let mut pm = Pix::new(20, 10, PixelDepth::Bit8).unwrap().to_mut();
//! pm.set_all_arbitrary(100);
//! pm.set_pixel(5, 5, 10).unwrap();
//! pm.set_pixel(14, 5, 20).unwrap();
//! let surface: Pix = pm.into();
//!
//! let options = WatershedOptions::new().with_connectivity(ConnectivityType::FourWay);
//! let ws = watershed_segmentation(&surface, &options).unwrap();
//! assert_eq!(ws.basin_count().unwrap(), 2);
//! ```

pub mod conncomp;
pub mod error;
pub mod extrema;
pub mod render;
pub mod seeds;
mod surface;
pub mod watershed;

// Re-export core types
pub use leptonica_core;

// Re-export error types
pub use error::{RegionError, RegionResult};

pub use conncomp::ConnectivityType;
pub use extrema::{ExtremaOptions, find_extrema, find_local_maxima, find_local_minima};
pub use render::{create_random_colormap, render_colors, render_fill};
pub use seeds::{Seed, generate_seeds, seeds_to_mask, select_min_in_components};
pub use watershed::{Watershed, WatershedOptions, WatershedState, watershed_segmentation};

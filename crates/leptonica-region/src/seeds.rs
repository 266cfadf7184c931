//! Seed generation
//!
//! Reduces each connected component of a 1 bpp mask (typically the minima
//! mask from [`find_extrema`](crate::find_extrema)) to a single labelled
//! pixel. Labels are assigned 1, 2, 3, ... in the order components are
//! discovered by a raster scan.
//!
//! # See also
//!
//! C Leptonica: `pixSelectMinInConnComp()` in `seedfill.c`,
//! `pixGenerateFromPta()` in `pixconv.c`

use crate::conncomp::ConnectivityType;
use crate::error::{RegionError, RegionResult};
use crate::surface::{check_intensity_surface, check_mask};
use leptonica_core::{Error, Pix, PixelDepth};
use std::collections::VecDeque;
use tracing::{debug, warn};

/// A labelled starting pixel for the watershed flood
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Seed {
    /// Column
    pub x: u32,
    /// Row
    pub y: u32,
    /// Basin label, > 0
    pub label: u32,
}

impl Seed {
    /// Create a new seed
    pub fn new(x: u32, y: u32, label: u32) -> Self {
        Self { x, y, label }
    }
}

/// One seed per connected component of `mask`.
///
/// The seed is the component's first pixel in raster order. An empty mask
/// yields an empty seed set.
///
/// # Errors
///
/// Returns [`RegionError::InvalidParameters`] if `mask` is not 1 bpp.
pub fn generate_seeds(mask: &Pix, connectivity: ConnectivityType) -> RegionResult<Vec<Seed>> {
    check_mask(mask)?;
    let seeds: Vec<Seed> = mask_components(mask, connectivity)
        .iter()
        .zip(1u32..)
        .map(|(component, label)| {
            let (x, y) = component[0];
            Seed::new(x, y, label)
        })
        .collect();

    if seeds.is_empty() {
        warn!("seed mask has no foreground pixels; no seeds generated");
    } else {
        debug!(count = seeds.len(), "seeds generated");
    }
    Ok(seeds)
}

/// One seed per connected component of `mask`, placed at the component's
/// lowest-valued pixel in `surface`.
///
/// Ties go to the first pixel in raster order.
///
/// # Errors
///
/// - [`RegionError::InvalidSurface`] if `surface` is not an intensity surface
/// - [`RegionError::InvalidParameters`] if `mask` is not 1 bpp
/// - [`RegionError::Core`] with a dimension mismatch if the sizes differ
///
/// # See also
///
/// C Leptonica: `pixSelectMinInConnComp()`
pub fn select_min_in_components(
    surface: &Pix,
    mask: &Pix,
    connectivity: ConnectivityType,
) -> RegionResult<Vec<Seed>> {
    check_intensity_surface(surface)?;
    check_mask(mask)?;
    if surface.width() != mask.width() || surface.height() != mask.height() {
        return Err(RegionError::Core(Error::DimensionMismatch {
            expected: (surface.width(), surface.height()),
            actual: (mask.width(), mask.height()),
        }));
    }

    let seeds: Vec<Seed> = mask_components(mask, connectivity)
        .iter()
        .zip(1u32..)
        .map(|(component, label)| {
            let (x, y) = component
                .iter()
                .copied()
                .min_by_key(|&(x, y)| (surface.get_pixel_unchecked(x, y), y, x))
                .unwrap_or(component[0]);
            Seed::new(x, y, label)
        })
        .collect();

    if seeds.is_empty() {
        warn!("seed mask has no foreground pixels; no seeds selected");
    }
    Ok(seeds)
}

/// Render seed positions into a 1 bpp mask.
///
/// # Errors
///
/// Returns [`RegionError::InvalidSeed`] if a seed lies outside the image.
///
/// # See also
///
/// C Leptonica: `pixGenerateFromPta()`
pub fn seeds_to_mask(seeds: &[Seed], width: u32, height: u32) -> RegionResult<Pix> {
    let mut pm = Pix::new(width, height, PixelDepth::Bit1)
        .map_err(RegionError::Core)?
        .try_into_mut()
        .unwrap_or_else(|p| p.to_mut());
    for seed in seeds {
        if seed.x >= width || seed.y >= height {
            return Err(RegionError::InvalidSeed {
                x: seed.x,
                y: seed.y,
            });
        }
        pm.set_pixel_unchecked(seed.x, seed.y, 1);
    }
    Ok(pm.into())
}

/// Connected components of the set pixels of a 1 bpp mask.
///
/// Components are returned in raster order of their first pixel; the first
/// element of each component is that pixel.
fn mask_components(mask: &Pix, connectivity: ConnectivityType) -> Vec<Vec<(u32, u32)>> {
    let width = mask.width();
    let height = mask.height();
    let w = width as usize;
    let mut visited = vec![false; w * height as usize];
    let mut components = Vec::new();
    let mut queue = VecDeque::new();

    for y in 0..height {
        for x in 0..width {
            let idx = y as usize * w + x as usize;
            if visited[idx] || mask.get_pixel_unchecked(x, y) == 0 {
                continue;
            }
            visited[idx] = true;
            queue.push_back((x, y));
            let mut component = Vec::new();
            while let Some((cx, cy)) = queue.pop_front() {
                component.push((cx, cy));
                for (nx, ny) in connectivity.neighbors(cx, cy, width, height) {
                    let nidx = ny as usize * w + nx as usize;
                    if !visited[nidx] && mask.get_pixel_unchecked(nx, ny) != 0 {
                        visited[nidx] = true;
                        queue.push_back((nx, ny));
                    }
                }
            }
            components.push(component);
        }
    }

    components
}

//! Local extrema detection
//!
//! Finds regional minima and maxima of an 8 or 16 bpp intensity surface.
//! A minimum is a plateau (a connected set of equal-valued pixels, possibly
//! a single pixel) none of whose members has a strictly lower neighbour.
//! Qualifying plateaus are marked in full; reducing them to one pixel is
//! the job of the seed generator.
//!
//! The depth of a minimum is the rise from the plateau value to the lowest
//! pass over which an equal or lower pixel outside the plateau can be
//! reached. It is measured with a priority flood outward from the plateau,
//! so a shallow dip on a slope is suppressed while a deep valley survives.
//! Two equal pits joined by a low ridge are each only as deep as the ridge.
//! A plateau from which nothing equal or lower can be reached is the unique
//! global minimum and always passes.
//!
//! Maxima are found by running the same procedure on the inverted surface.
//!
//! # See also
//!
//! C Leptonica: `pixLocalExtrema()`, `pixQualifyLocalMinima()` in `seedfill.c`

use crate::conncomp::{ConnectivityType, on_border};
use crate::error::RegionResult;
use crate::surface::{check_intensity_surface, pack, unpack};
use leptonica_core::{Heap, HeapDirection, Pix, PixelDepth};
use std::collections::VecDeque;
use tracing::debug;

/// Options for extrema detection
#[derive(Debug, Clone)]
pub struct ExtremaOptions {
    /// Minimum depth (minima) or height (maxima) for a plateau to qualify.
    /// 0 disables the filter.
    pub min_depth: u32,
    /// Connectivity used for plateaus and neighbour comparisons
    pub connectivity: ConnectivityType,
    /// Consider plateaus that touch the image border
    pub include_border: bool,
}

impl Default for ExtremaOptions {
    fn default() -> Self {
        Self {
            min_depth: 0,
            connectivity: ConnectivityType::EightWay,
            include_border: false,
        }
    }
}

impl ExtremaOptions {
    /// Create new options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set minimum depth
    pub fn with_min_depth(mut self, depth: u32) -> Self {
        self.min_depth = depth;
        self
    }

    /// Set connectivity type
    pub fn with_connectivity(mut self, connectivity: ConnectivityType) -> Self {
        self.connectivity = connectivity;
        self
    }

    /// Allow plateaus touching the image border
    pub fn with_include_border(mut self, include: bool) -> Self {
        self.include_border = include;
        self
    }
}

/// Find local minima and maxima of an intensity surface.
///
/// Returns `(min_mask, max_mask)`, two 1 bpp images of the surface size.
///
/// # Errors
///
/// Returns [`RegionError::InvalidSurface`](crate::RegionError::InvalidSurface)
/// unless the surface is 8 or 16 bpp without a colormap.
///
/// # See also
///
/// C Leptonica: `pixLocalExtrema()`
pub fn find_extrema(surface: &Pix, options: &ExtremaOptions) -> RegionResult<(Pix, Pix)> {
    check_intensity_surface(surface)?;
    let width = surface.width();
    let height = surface.height();
    let values = unpack(surface);

    let minima = mark_minima(&values, width, height, options);

    let top = surface.depth().max_value();
    let inverted: Vec<u32> = values.iter().map(|&v| top - v).collect();
    let maxima = mark_minima(&inverted, width, height, options);

    debug!(
        width,
        height,
        min_pixels = minima.iter().filter(|&&m| m != 0).count(),
        max_pixels = maxima.iter().filter(|&&m| m != 0).count(),
        min_depth = options.min_depth,
        "local extrema found"
    );

    Ok((
        pack(width, height, PixelDepth::Bit1, &minima)?,
        pack(width, height, PixelDepth::Bit1, &maxima)?,
    ))
}

/// Find local minima, returned as pixel positions in raster order.
///
/// Uses default [`ExtremaOptions`] with the given connectivity.
pub fn find_local_minima(
    surface: &Pix,
    connectivity: ConnectivityType,
) -> RegionResult<Vec<(u32, u32)>> {
    let options = ExtremaOptions::new().with_connectivity(connectivity);
    let (min_mask, _) = find_extrema(surface, &options)?;
    Ok(mask_points(&min_mask))
}

/// Find local maxima, returned as pixel positions in raster order.
///
/// Uses default [`ExtremaOptions`] with the given connectivity.
pub fn find_local_maxima(
    surface: &Pix,
    connectivity: ConnectivityType,
) -> RegionResult<Vec<(u32, u32)>> {
    let options = ExtremaOptions::new().with_connectivity(connectivity);
    let (_, max_mask) = find_extrema(surface, &options)?;
    Ok(mask_points(&max_mask))
}

fn mask_points(mask: &Pix) -> Vec<(u32, u32)> {
    let mut points = Vec::new();
    for y in 0..mask.height() {
        for x in 0..mask.width() {
            if mask.get_pixel_unchecked(x, y) != 0 {
                points.push((x, y));
            }
        }
    }
    points
}

/// Mark regional minima of a raster-order value array (1 = minimum).
fn mark_minima(values: &[u32], width: u32, height: u32, options: &ExtremaOptions) -> Vec<u32> {
    let w = width as usize;
    let n = values.len();
    let mut visited = vec![false; n];
    let mut selected = vec![0u32; n];
    let mut flood = DepthFlood::new(n);
    let mut plateau = Vec::new();
    let mut queue = VecDeque::new();

    for start in 0..n {
        if visited[start] {
            continue;
        }
        let value = values[start];
        let mut has_lower = false;
        let mut touches_border = false;

        plateau.clear();
        visited[start] = true;
        queue.push_back(start);
        while let Some(idx) = queue.pop_front() {
            plateau.push(idx);
            let (x, y) = ((idx % w) as u32, (idx / w) as u32);
            touches_border |= on_border(x, y, width, height);
            for (nx, ny) in options.connectivity.neighbors(x, y, width, height) {
                let nidx = ny as usize * w + nx as usize;
                let nval = values[nidx];
                if nval < value {
                    has_lower = true;
                } else if nval == value && !visited[nidx] {
                    visited[nidx] = true;
                    queue.push_back(nidx);
                }
            }
        }

        if has_lower || (touches_border && !options.include_border) {
            continue;
        }
        if options.min_depth > 0
            && !flood.is_deep(values, width, height, &plateau, value, options)
        {
            continue;
        }
        for &idx in &plateau {
            selected[idx] = 1;
        }
    }

    selected
}

/// Reusable scratch space for the depth test.
///
/// Pixels are marked with the current epoch instead of clearing a boolean
/// buffer for every plateau.
struct DepthFlood {
    marks: Vec<u32>,
    epoch: u32,
}

impl DepthFlood {
    fn new(n: usize) -> Self {
        Self {
            marks: vec![0; n],
            epoch: 0,
        }
    }

    /// Whether the plateau at `value` is at least `min_depth` deep.
    fn is_deep(
        &mut self,
        values: &[u32],
        width: u32,
        height: u32,
        plateau: &[usize],
        value: u32,
        options: &ExtremaOptions,
    ) -> bool {
        self.epoch += 1;
        let connectivity = options.connectivity;
        let mut heap = Heap::with_direction(HeapDirection::Increasing);

        for &idx in plateau {
            self.marks[idx] = self.epoch;
        }
        for &idx in plateau {
            self.push_neighbors(&mut heap, values, idx, width, height, connectivity);
        }

        // `level` is the highest pass crossed so far
        let mut level = value;
        while let Ok(item) = heap.remove() {
            let idx = item.payload;
            let v = values[idx];
            // Plateau pixels carry the epoch mark, so this is another pit
            if v <= value {
                return level - value >= options.min_depth;
            }
            level = level.max(v);
            if level - value >= options.min_depth {
                return true;
            }
            self.push_neighbors(&mut heap, values, idx, width, height, connectivity);
        }

        // Nothing equal or lower is reachable: unique global minimum
        true
    }

    fn push_neighbors(
        &mut self,
        heap: &mut Heap<usize>,
        values: &[u32],
        idx: usize,
        width: u32,
        height: u32,
        connectivity: ConnectivityType,
    ) {
        let w = width as usize;
        let (x, y) = ((idx % w) as u32, (idx / w) as u32);
        for (nx, ny) in connectivity.neighbors(x, y, width, height) {
            let nidx = ny as usize * w + nx as usize;
            if self.marks[nidx] != self.epoch {
                self.marks[nidx] = self.epoch;
                heap.add(values[nidx] as f32, nidx);
            }
        }
    }
}

//! Watershed segmentation
//!
//! Seeded region growing over an intensity surface. Each seed starts a
//! basin; a priority queue keyed on flood level always expands the lowest
//! pending pixel, so basins rise together like water filling a landscape.
//! Where two basins would meet, the contested pixel is recorded as a
//! watershed boundary and assigned to neither. Pockets that boundary pixels
//! cut off from every seed join the boundary as well, so without a level cap
//! each pixel ends up either in a basin or on a boundary.
//!
//! The engine is a small state machine: [`Watershed::new`] validates the
//! input, [`Watershed::apply`] floods once, and the result accessors are
//! available only after flooding completes.
//!
//! # Determinism
//!
//! Equal flood levels are expanded in insertion order and neighbours are
//! scanned in the raster order of their offsets, so identical inputs always
//! produce identical label maps and boundaries.
//!
//! # Examples
//!
//! ```
//! use leptonica_core::{Pix, PixelDepth};
//! use leptonica_region::{ConnectivityType, Seed, Watershed, WatershedOptions};
//!
//! // A valley along x = 0..3, a ridge at x = 4, another valley x = 5..8
//! let mut pm = Pix::new(9, 3, PixelDepth::Bit8).unwrap().to_mut();
//! for y in 0..3 {
//!     for x in 0..9u32 {
//!         pm.set_pixel(x, y, 40 - 10 * x.abs_diff(4)).unwrap();
//!     }
//! }
//! let surface: Pix = pm.into();
//!
//! let seeds = [Seed::new(0, 1, 1), Seed::new(8, 1, 2)];
//! let options = WatershedOptions::new().with_connectivity(ConnectivityType::FourWay);
//! let mut ws = Watershed::new(&surface, &seeds, &options).unwrap();
//! ws.apply().unwrap();
//!
//! assert_eq!(ws.basin_count().unwrap(), 2);
//! assert_eq!(ws.boundary_mask().unwrap().get_pixel(4, 1), Some(1));
//! ```
//!
//! # See also
//!
//! C Leptonica: `watershed.c` (`wshedCreate()`, `wshedApply()`, `wshedBasins()`)

use crate::conncomp::ConnectivityType;
use crate::error::{RegionError, RegionResult};
use crate::extrema::{ExtremaOptions, find_extrema};
use crate::seeds::{Seed, generate_seeds};
use crate::surface::{check_intensity_surface, pack, unpack};
use leptonica_core::{Box, Heap, HeapDirection, Numa, Pix, PixelDepth, Pixa};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Options for watershed segmentation
#[derive(Debug, Clone)]
pub struct WatershedOptions {
    /// Highest flood level; pixels that would need a higher level stay
    /// unflooded
    pub max_level: i32,
    /// Connectivity type for finding neighbors
    pub connectivity: ConnectivityType,
    /// Minimum depth of the minima used as seeds by
    /// [`watershed_segmentation`]; 0 keeps every minimum
    pub min_depth: u32,
}

impl Default for WatershedOptions {
    fn default() -> Self {
        Self {
            max_level: i32::MAX,
            connectivity: ConnectivityType::EightWay,
            min_depth: 0,
        }
    }
}

impl WatershedOptions {
    /// Create new options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum flood level
    pub fn with_max_level(mut self, level: i32) -> Self {
        self.max_level = level;
        self
    }

    /// Set connectivity type
    pub fn with_connectivity(mut self, connectivity: ConnectivityType) -> Self {
        self.connectivity = connectivity;
        self
    }

    /// Set minimum basin depth for generated seeds
    pub fn with_min_depth(mut self, depth: u32) -> Self {
        self.min_depth = depth;
        self
    }
}

/// Lifecycle of a [`Watershed`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatershedState {
    /// Validated, not yet flooded
    Created,
    /// Flood in progress
    Flooding,
    /// Flood finished; results are available
    Done,
}

/// Queue entry of the flood
#[derive(Debug, Clone, Copy)]
struct FloodPixel {
    x: u32,
    y: u32,
    label: u32,
    level: u32,
}

/// Results published once flooding completes
#[derive(Debug)]
struct FloodOutput {
    labels: Pix,
    levels: Pix,
    boundary: Pix,
    final_levels: Numa,
    boundary_count: u64,
}

/// Seeded watershed flood over an intensity surface
///
/// # See also
///
/// C Leptonica: `L_WSHED` in `watershed.h`
#[derive(Debug)]
pub struct Watershed {
    surface: Pix,
    seeds: Vec<Seed>,
    options: WatershedOptions,
    state: WatershedState,
    output: Option<FloodOutput>,
}

impl Watershed {
    /// Create an engine for `surface` with caller-supplied seeds.
    ///
    /// # Errors
    ///
    /// - [`RegionError::InvalidSurface`] unless `surface` is 8 or 16 bpp
    ///   without a colormap
    /// - [`RegionError::InvalidParameters`] for a negative `max_level`, a seed
    ///   label of 0 or above the pixel count, or a duplicated label or position
    /// - [`RegionError::InvalidSeed`] for a seed outside the image
    ///
    /// # See also
    ///
    /// C Leptonica: `wshedCreate()`
    pub fn new(surface: &Pix, seeds: &[Seed], options: &WatershedOptions) -> RegionResult<Self> {
        check_intensity_surface(surface)?;
        if options.max_level < 0 {
            return Err(RegionError::InvalidParameters(format!(
                "max_level must be non-negative, got {}",
                options.max_level
            )));
        }

        let width = surface.width();
        let height = surface.height();
        let max_label = u64::from(width) * u64::from(height);
        let mut labels = HashSet::with_capacity(seeds.len());
        let mut positions = HashSet::with_capacity(seeds.len());
        for seed in seeds {
            if seed.x >= width || seed.y >= height {
                return Err(RegionError::InvalidSeed {
                    x: seed.x,
                    y: seed.y,
                });
            }
            if seed.label == 0 || u64::from(seed.label) > max_label {
                return Err(RegionError::InvalidParameters(format!(
                    "seed label must be in 1..={max_label}, got {}",
                    seed.label
                )));
            }
            if !labels.insert(seed.label) {
                return Err(RegionError::InvalidParameters(format!(
                    "duplicate seed label {}",
                    seed.label
                )));
            }
            if !positions.insert((seed.x, seed.y)) {
                return Err(RegionError::InvalidParameters(format!(
                    "duplicate seed position ({}, {})",
                    seed.x, seed.y
                )));
            }
        }

        Ok(Self {
            surface: surface.clone(),
            seeds: seeds.to_vec(),
            options: options.clone(),
            state: WatershedState::Created,
            output: None,
        })
    }

    /// Create an engine whose seeds are the components of a 1 bpp mask.
    ///
    /// Seeds come from [`generate_seeds`] with the options' connectivity.
    pub fn from_seed_mask(
        surface: &Pix,
        mask: &Pix,
        options: &WatershedOptions,
    ) -> RegionResult<Self> {
        let seeds = generate_seeds(mask, options.connectivity)?;
        Self::new(surface, &seeds, options)
    }

    /// Current lifecycle state
    pub fn state(&self) -> WatershedState {
        self.state
    }

    /// The seeds this engine floods from
    pub fn seeds(&self) -> &[Seed] {
        &self.seeds
    }

    /// The intensity surface
    pub fn surface(&self) -> &Pix {
        &self.surface
    }

    /// The options the engine was created with
    pub fn options(&self) -> &WatershedOptions {
        &self.options
    }

    /// Run the flood.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::InvalidParameters`] if the engine has already
    /// been applied. If flooding fails the engine returns to
    /// [`WatershedState::Created`] and no partial results are exposed.
    ///
    /// # See also
    ///
    /// C Leptonica: `wshedApply()`
    pub fn apply(&mut self) -> RegionResult<()> {
        if self.state != WatershedState::Created {
            return Err(RegionError::InvalidParameters(
                "watershed has already been applied".to_string(),
            ));
        }

        self.state = WatershedState::Flooding;
        match flood(&self.surface, &self.seeds, &self.options) {
            Ok(output) => {
                self.output = Some(output);
                self.state = WatershedState::Done;
                Ok(())
            }
            Err(e) => {
                self.state = WatershedState::Created;
                Err(e)
            }
        }
    }

    fn output(&self) -> RegionResult<&FloodOutput> {
        match (self.state, &self.output) {
            (WatershedState::Done, Some(output)) => Ok(output),
            _ => Err(RegionError::NotReady),
        }
    }

    /// 32 bpp label map: basin label per pixel, 0 for boundary and
    /// unflooded pixels.
    pub fn label_map(&self) -> RegionResult<&Pix> {
        Ok(&self.output()?.labels)
    }

    /// 32 bpp flood level at which each labelled pixel was reached.
    pub fn level_map(&self) -> RegionResult<&Pix> {
        Ok(&self.output()?.levels)
    }

    /// 1 bpp mask of watershed boundary pixels.
    pub fn boundary_mask(&self) -> RegionResult<&Pix> {
        Ok(&self.output()?.boundary)
    }

    /// Highest flood level reached by each basin, indexed by `label - 1`.
    ///
    /// Entries for labels not used by any seed are 0.
    pub fn final_levels(&self) -> RegionResult<&Numa> {
        Ok(&self.output()?.final_levels)
    }

    /// Number of basins (one per seed).
    pub fn basin_count(&self) -> RegionResult<usize> {
        self.output()?;
        Ok(self.seeds.len())
    }

    /// Number of boundary pixels.
    pub fn boundary_count(&self) -> RegionResult<u64> {
        Ok(self.output()?.boundary_count)
    }

    /// Extract each basin as a 1 bpp mask clipped to its bounding box.
    ///
    /// Basins are returned in increasing label order; the bounding boxes are
    /// stored in the `Pixa`, and the `Numa` holds the matching final levels.
    ///
    /// # See also
    ///
    /// C Leptonica: `wshedBasins()`
    pub fn basins(&self) -> RegionResult<(Pixa, Numa)> {
        let output = self.output()?;
        let labels = &output.labels;
        let width = labels.width();
        let height = labels.height();

        let slots = output.final_levels.len();
        let mut bounds: Vec<Option<(u32, u32, u32, u32)>> = vec![None; slots];
        for y in 0..height {
            for x in 0..width {
                let label = labels.get_pixel_unchecked(x, y);
                if label == 0 {
                    continue;
                }
                let slot = &mut bounds[(label - 1) as usize];
                *slot = Some(match *slot {
                    None => (x, y, x, y),
                    Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
                });
            }
        }

        let mut ordered: Vec<u32> = self.seeds.iter().map(|s| s.label).collect();
        ordered.sort_unstable();

        let mut pixa = Pixa::with_capacity(ordered.len());
        let mut levels = Numa::with_capacity(ordered.len());
        for label in ordered {
            let idx = (label - 1) as usize;
            let Some((x0, y0, x1, y1)) = bounds[idx] else {
                continue;
            };
            let bw = x1 - x0 + 1;
            let bh = y1 - y0 + 1;
            let mut pm = Pix::new(bw, bh, PixelDepth::Bit1)?
                .try_into_mut()
                .unwrap_or_else(|p| p.to_mut());
            for y in y0..=y1 {
                for x in x0..=x1 {
                    if labels.get_pixel_unchecked(x, y) == label {
                        pm.set_pixel_unchecked(x - x0, y - y0, 1);
                    }
                }
            }
            let b = Box::new(x0 as i32, y0 as i32, bw as i32, bh as i32)?;
            pixa.push_with_box(pm.into(), b);
            levels.push(output.final_levels.get(idx).unwrap_or(0.0));
        }

        Ok((pixa, levels))
    }
}

/// Flood the surface from the seeds.
fn flood(surface: &Pix, seeds: &[Seed], options: &WatershedOptions) -> RegionResult<FloodOutput> {
    let width = surface.width();
    let height = surface.height();
    let w = width as usize;
    let n = w * height as usize;
    let connectivity = options.connectivity;
    let max_level = i64::from(options.max_level);
    let values = unpack(surface);

    info!(
        width,
        height,
        seeds = seeds.len(),
        max_level = options.max_level,
        "watershed flood started"
    );

    let mut labels = vec![0u32; n];
    let mut levels = vec![0u32; n];
    let mut boundary = vec![0u32; n];
    let mut boundary_count = 0u64;
    let mut heap = Heap::new(seeds.len().max(1) * 4, HeapDirection::Increasing);

    for seed in seeds {
        let idx = seed.y as usize * w + seed.x as usize;
        let level = values[idx];
        labels[idx] = seed.label;
        levels[idx] = level;
        heap.add(
            level as f32,
            FloodPixel {
                x: seed.x,
                y: seed.y,
                label: seed.label,
                level,
            },
        );
    }

    let mut frontier = Vec::new();
    let mut heap_peak = heap.len();
    while !heap.is_empty() {
        let p = heap.remove()?.payload;
        for (qx, qy) in connectivity.neighbors(p.x, p.y, width, height) {
            let q = qy as usize * w + qx as usize;
            if labels[q] != 0 || boundary[q] != 0 {
                continue;
            }
            let level = p.level.max(values[q]);
            if i64::from(level) > max_level {
                continue;
            }
            let contested = connectivity.neighbors(qx, qy, width, height).any(|(rx, ry)| {
                let other = labels[ry as usize * w + rx as usize];
                other != 0 && other != p.label
            });
            if contested {
                boundary[q] = 1;
                boundary_count += 1;
                frontier.push(FloodPixel {
                    x: qx,
                    y: qy,
                    label: 0,
                    level,
                });
                continue;
            }
            labels[q] = p.label;
            levels[q] = level;
            heap.add(
                level as f32,
                FloodPixel {
                    x: qx,
                    y: qy,
                    label: p.label,
                    level,
                },
            );
        }
        heap_peak = heap_peak.max(heap.len());
    }

    // Pixels walled in by boundary pixels are unreachable from every seed;
    // flood them from the boundary and add them to it
    let mut enclosed = 0u64;
    let mut walls = Heap::new(frontier.len().max(1), HeapDirection::Increasing);
    for b in frontier {
        walls.add(b.level as f32, b);
    }
    while !walls.is_empty() {
        let p = walls.remove()?.payload;
        for (qx, qy) in connectivity.neighbors(p.x, p.y, width, height) {
            let q = qy as usize * w + qx as usize;
            if labels[q] != 0 || boundary[q] != 0 {
                continue;
            }
            let level = p.level.max(values[q]);
            if i64::from(level) > max_level {
                continue;
            }
            boundary[q] = 1;
            enclosed += 1;
            walls.add(
                level as f32,
                FloodPixel {
                    x: qx,
                    y: qy,
                    label: 0,
                    level,
                },
            );
        }
    }
    if enclosed > 0 {
        debug!(enclosed, "enclosed pixels added to the boundary");
    }
    boundary_count += enclosed;

    let slots = seeds.iter().map(|s| s.label).max().unwrap_or(0) as usize;
    let mut final_levels = vec![0f32; slots];
    for (&label, &level) in labels.iter().zip(&levels) {
        if label != 0 {
            let slot = &mut final_levels[(label - 1) as usize];
            *slot = slot.max(level as f32);
        }
    }

    let unflooded = labels
        .iter()
        .zip(&boundary)
        .filter(|&(&l, &b)| l == 0 && b == 0)
        .count();
    info!(
        basins = seeds.len(),
        boundary = boundary_count,
        unflooded,
        heap_peak,
        "watershed flood complete"
    );

    Ok(FloodOutput {
        labels: pack(width, height, PixelDepth::Bit32, &labels)?,
        levels: pack(width, height, PixelDepth::Bit32, &levels)?,
        boundary: pack(width, height, PixelDepth::Bit1, &boundary)?,
        final_levels: Numa::from_vec(final_levels),
        boundary_count,
    })
}

/// Segment an intensity surface end to end.
///
/// Finds the local minima (filtered by `options.min_depth`), turns each
/// minimum plateau into a seed, and floods. Returns the finished engine.
///
/// # Errors
///
/// Returns [`RegionError::InvalidSurface`] unless the surface is 8 or 16 bpp
/// without a colormap, or [`RegionError::InvalidParameters`] for a negative
/// `max_level`.
pub fn watershed_segmentation(surface: &Pix, options: &WatershedOptions) -> RegionResult<Watershed> {
    check_intensity_surface(surface)?;
    let extrema_options = ExtremaOptions::new()
        .with_min_depth(options.min_depth)
        .with_connectivity(options.connectivity);
    let (min_mask, _) = find_extrema(surface, &extrema_options)?;
    let seeds = generate_seeds(&min_mask, options.connectivity)?;
    if seeds.is_empty() {
        warn!("no qualifying minima; the surface will stay unflooded");
    }
    debug!(seeds = seeds.len(), "seeding watershed from local minima");

    let mut ws = Watershed::new(surface, &seeds, options)?;
    ws.apply()?;
    Ok(ws)
}

//! Rendering of watershed results
//!
//! Thin consumers of a finished [`Watershed`]: a fill image painted with
//! each basin's final level, and a pseudo-colour image with a reproducible
//! random palette.
//!
//! # See also
//!
//! C Leptonica: `wshedRenderFill()`, `wshedRenderColors()` in `watershed.c`,
//! `pixcmapCreateRandom()` in `colormap.c`

use crate::error::{RegionError, RegionResult};
use crate::watershed::Watershed;
use leptonica_core::{Pix, PixColormap, PixelDepth};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Colormap index used for boundary pixels
pub const BOUNDARY_INDEX: u32 = 0;
/// Colormap index used for unflooded pixels
pub const UNFLOODED_INDEX: u32 = 255;

/// Paint every basin pixel with its basin's final level.
///
/// The output has the depth of the surface; boundary and unflooded pixels
/// are 0.
///
/// # Errors
///
/// Returns [`RegionError::NotReady`] if the engine has not been applied.
pub fn render_fill(ws: &Watershed) -> RegionResult<Pix> {
    let labels = ws.label_map()?;
    let final_levels = ws.final_levels()?;
    let depth = ws.surface().depth();
    let top = depth.max_value();

    let mut pm = Pix::new(labels.width(), labels.height(), depth)
        .map_err(RegionError::Core)?
        .try_into_mut()
        .unwrap_or_else(|p| p.to_mut());
    for y in 0..labels.height() {
        for x in 0..labels.width() {
            let label = labels.get_pixel_unchecked(x, y);
            if label == 0 {
                continue;
            }
            let level = final_levels.get((label - 1) as usize).unwrap_or(0.0);
            pm.set_pixel_unchecked(x, y, (level as u32).min(top));
        }
    }
    Ok(pm.into())
}

/// Render basins as an 8 bpp colormapped image.
///
/// Basin label `L` maps to colormap index `1 + (L - 1) % 254`; boundary
/// pixels use index 0 (black) and unflooded pixels index 255 (white). The
/// palette is drawn from a generator seeded with `seed`.
///
/// # Errors
///
/// Returns [`RegionError::NotReady`] if the engine has not been applied.
pub fn render_colors(ws: &Watershed, seed: u64) -> RegionResult<Pix> {
    let labels = ws.label_map()?;
    let boundary = ws.boundary_mask()?;

    let mut pm = Pix::new(labels.width(), labels.height(), PixelDepth::Bit8)
        .map_err(RegionError::Core)?
        .try_into_mut()
        .unwrap_or_else(|p| p.to_mut());
    pm.set_colormap(Some(create_random_colormap(seed)?))?;

    for y in 0..labels.height() {
        for x in 0..labels.width() {
            let label = labels.get_pixel_unchecked(x, y);
            let index = if label != 0 {
                1 + (label - 1) % 254
            } else if boundary.get_pixel_unchecked(x, y) != 0 {
                BOUNDARY_INDEX
            } else {
                UNFLOODED_INDEX
            };
            pm.set_pixel_unchecked(x, y, index);
        }
    }
    Ok(pm.into())
}

/// Create a 256-entry colormap of random colours.
///
/// Entry 0 is black and entry 255 is white; the same `seed` always yields
/// the same palette.
///
/// # See also
///
/// C Leptonica: `pixcmapCreateRandom(8, 1, 1)`
pub fn create_random_colormap(seed: u64) -> RegionResult<PixColormap> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut cmap = PixColormap::new(8)?;
    cmap.add_rgb(0, 0, 0)?;
    for _ in 1..255 {
        cmap.add_rgb(rng.random(), rng.random(), rng.random())?;
    }
    cmap.add_rgb(255, 255, 255)?;
    Ok(cmap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conncomp::ConnectivityType;
    use crate::seeds::Seed;
    use crate::watershed::WatershedOptions;

    fn applied(max_level: i32) -> Watershed {
        // Tall enough that label 300 is a valid seed label
        let mut pm = Pix::new(9, 40, PixelDepth::Bit8).unwrap().to_mut();
        for y in 0..40 {
            for x in 0..9u32 {
                pm.set_pixel(x, y, 40 - 10 * x.abs_diff(4)).unwrap();
            }
        }
        let surface: Pix = pm.into();
        let seeds = [Seed::new(0, 1, 1), Seed::new(8, 1, 300)];
        let options = WatershedOptions::new()
            .with_connectivity(ConnectivityType::FourWay)
            .with_max_level(max_level);
        let mut ws = Watershed::new(&surface, &seeds, &options).unwrap();
        ws.apply().unwrap();
        ws
    }

    #[test]
    fn test_random_colormap() {
        let a = create_random_colormap(42).unwrap();
        let b = create_random_colormap(42).unwrap();
        assert_eq!(a.len(), 256);
        assert_eq!(a.get_rgb(0), Some((0, 0, 0)));
        assert_eq!(a.get_rgb(255), Some((255, 255, 255)));
        assert_eq!(a.colors(), b.colors());
    }

    #[test]
    fn test_render_fill() {
        let ws = applied(i32::MAX);
        let fill = render_fill(&ws).unwrap();
        assert_eq!(fill.depth(), PixelDepth::Bit8);
        assert_eq!(fill.get_pixel(0, 0), Some(30));
        assert_eq!(fill.get_pixel(7, 2), Some(30));
        assert_eq!(fill.get_pixel(4, 1), Some(0));
    }

    #[test]
    fn test_render_colors_indices() {
        let ws = applied(25);
        let colors = render_colors(&ws, 7).unwrap();
        assert!(colors.has_colormap());
        assert_eq!(colors.get_pixel(0, 0), Some(1));
        // Label 300 wraps to 1 + 299 % 254 = 46
        assert_eq!(colors.get_pixel(8, 0), Some(46));
        // x = 3..5 need level 30 or more: unflooded
        assert_eq!(colors.get_pixel(4, 1), Some(UNFLOODED_INDEX));

        let ws = applied(i32::MAX);
        let colors = render_colors(&ws, 7).unwrap();
        assert_eq!(colors.get_pixel(4, 1), Some(BOUNDARY_INDEX));
    }

    #[test]
    fn test_render_not_ready() {
        let surface = Pix::new(4, 4, PixelDepth::Bit8).unwrap();
        let ws = Watershed::new(&surface, &[], &WatershedOptions::default()).unwrap();
        assert!(matches!(render_fill(&ws), Err(RegionError::NotReady)));
        assert!(matches!(render_colors(&ws, 1), Err(RegionError::NotReady)));
    }
}

//! Intensity-surface helpers shared by extrema detection and flooding.

use crate::error::{RegionError, RegionResult};
use leptonica_core::{Pix, PixelDepth};

/// Check that `pix` is a single-channel 8 or 16 bpp image without colormap.
pub(crate) fn check_intensity_surface(pix: &Pix) -> RegionResult<()> {
    if !matches!(pix.depth(), PixelDepth::Bit8 | PixelDepth::Bit16) {
        return Err(RegionError::InvalidSurface(format!(
            "expected 8 or 16 bpp, got {} bpp",
            pix.depth().bits()
        )));
    }
    if pix.has_colormap() {
        return Err(RegionError::InvalidSurface(
            "colormapped image is not an intensity surface".to_string(),
        ));
    }
    Ok(())
}

/// Check that `mask` is a 1 bpp image.
pub(crate) fn check_mask(mask: &Pix) -> RegionResult<()> {
    if mask.depth() != PixelDepth::Bit1 {
        return Err(RegionError::InvalidParameters(format!(
            "mask must be 1 bpp, got {} bpp",
            mask.depth().bits()
        )));
    }
    Ok(())
}

/// Unpack all pixel values of `pix` in raster order.
pub(crate) fn unpack(pix: &Pix) -> Vec<u32> {
    let mut values = Vec::with_capacity(pix.width() as usize * pix.height() as usize);
    for y in 0..pix.height() {
        for x in 0..pix.width() {
            values.push(pix.get_pixel_unchecked(x, y));
        }
    }
    values
}

/// Pack raster-order values into a new image of the given depth.
///
/// Values are masked to the depth.
pub(crate) fn pack(width: u32, height: u32, depth: PixelDepth, values: &[u32]) -> RegionResult<Pix> {
    let mut pm = Pix::new(width, height, depth)
        .map_err(RegionError::Core)?
        .try_into_mut()
        .unwrap_or_else(|p| p.to_mut());
    for (i, &v) in values.iter().enumerate() {
        if v != 0 {
            let x = (i % width as usize) as u32;
            let y = (i / width as usize) as u32;
            pm.set_pixel_unchecked(x, y, v);
        }
    }
    Ok(pm.into())
}

//! PixColormap - Palette for indexed images
//!
//! Rendered basin maps are 8 bpp images whose values index a colormap.
//!
//! # See also
//!
//! C Leptonica: `colormap.c`

use crate::error::{Error, Result};

/// One palette entry
///
/// # See also
///
/// C Leptonica: `RGBA_QUAD` in `pix.h`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RgbaQuad {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl RgbaQuad {
    /// Opaque colour
    pub fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 255,
        }
    }
}

/// Palette of up to `2^depth` colours
///
/// # See also
///
/// C Leptonica: `pixcmapCreate()` in `colormap.c`
#[derive(Debug, Clone)]
pub struct PixColormap {
    colors: Vec<RgbaQuad>,
    depth: u32,
}

impl PixColormap {
    /// Create an empty palette for a 1, 2, 4 or 8 bpp image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDepth`] for any other depth.
    pub fn new(depth: u32) -> Result<Self> {
        if !matches!(depth, 1 | 2 | 4 | 8) {
            return Err(Error::InvalidDepth(depth));
        }
        Ok(Self {
            colors: Vec::with_capacity(1 << depth),
            depth,
        })
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Capacity implied by the depth.
    #[inline]
    pub fn max_entries(&self) -> usize {
        1 << self.depth
    }

    pub fn get(&self, index: usize) -> Option<&RgbaQuad> {
        self.colors.get(index)
    }

    /// Append a colour and return its index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] once all `max_entries` slots are
    /// used.
    ///
    /// # See also
    ///
    /// C Leptonica: `pixcmapAddColor()`
    pub fn add_color(&mut self, color: RgbaQuad) -> Result<usize> {
        if self.colors.len() >= self.max_entries() {
            return Err(Error::InvalidParameter(format!(
                "colormap already holds {} colors",
                self.max_entries()
            )));
        }
        self.colors.push(color);
        Ok(self.colors.len() - 1)
    }

    pub fn add_rgb(&mut self, r: u8, g: u8, b: u8) -> Result<usize> {
        self.add_color(RgbaQuad::rgb(r, g, b))
    }

    pub fn get_rgb(&self, index: usize) -> Option<(u8, u8, u8)> {
        self.get(index).map(|c| (c.red, c.green, c.blue))
    }

    pub fn colors(&self) -> &[RgbaQuad] {
        &self.colors
    }
}

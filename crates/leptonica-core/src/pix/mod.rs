//! PIX - Packed raster image
//!
//! `Pix` carries the intensity surfaces, masks and label maps that flow
//! through segmentation. Every image is single-sample with a depth of
//! 1, 2, 4, 8, 16 or 32 bits.
//!
//! # Pixel layout
//!
//! Rows are `wpl` 32-bit words long and start on a word boundary. Within a
//! word pixels are packed from the most significant bit down, so pixel 0 of
//! an 8 bpp row sits in bits 31..24 of word 0.
//!
//! # Ownership model
//!
//! A `Pix` is immutable and cheap to clone (`Arc`). Writers obtain a
//! [`PixMut`] through [`Pix::try_into_mut`] (no copy when unshared) or
//! [`Pix::to_mut`] (always copies), and hand it back with `Into<Pix>`.
//!
//! # See also
//!
//! - C Leptonica: `pix.h` (struct `Pix`), `pix1.c` (creation)
//! - Pixel access: `GET_DATA_*` / `SET_DATA_*` macros in `arrayaccess.h`

mod access;

pub use access::*;

use crate::colormap::PixColormap;
use crate::error::{Error, Result};
use std::sync::Arc;

/// Fill value for border operations.
///
/// # See also
///
/// C Leptonica: `L_SET_BLACK`, `L_SET_WHITE` in `pix.h`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitColor {
    /// Zero
    Black,
    /// The largest value the depth can hold
    White,
}

/// Bits per pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum PixelDepth {
    /// Binary masks
    Bit1 = 1,
    /// 4-level images
    Bit2 = 2,
    /// 16-level images
    Bit4 = 4,
    /// 8-bit intensity or colormap index
    Bit8 = 8,
    /// 16-bit intensity
    Bit16 = 16,
    /// 32-bit labels and levels
    Bit32 = 32,
}

impl PixelDepth {
    /// Convert a raw bit count.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDepth`] for anything but 1, 2, 4, 8, 16 or 32.
    pub fn from_bits(bits: u32) -> Result<Self> {
        match bits {
            1 => Ok(PixelDepth::Bit1),
            2 => Ok(PixelDepth::Bit2),
            4 => Ok(PixelDepth::Bit4),
            8 => Ok(PixelDepth::Bit8),
            16 => Ok(PixelDepth::Bit16),
            32 => Ok(PixelDepth::Bit32),
            _ => Err(Error::InvalidDepth(bits)),
        }
    }

    pub fn bits(self) -> u32 {
        self as u32
    }

    /// Colormaps attach to 1, 2, 4 and 8 bpp images only.
    pub fn colormap_allowed(self) -> bool {
        self.bits() <= 8
    }

    /// Largest value a pixel of this depth can hold.
    pub fn max_value(self) -> u32 {
        match self {
            PixelDepth::Bit32 => u32::MAX,
            _ => (1u32 << self.bits()) - 1,
        }
    }

    /// Words needed for one row of `width` pixels.
    fn words_per_line(self, width: u32) -> Result<u32> {
        let words = (u64::from(width) * u64::from(self.bits())).div_ceil(32);
        u32::try_from(words).map_err(|_| {
            Error::InvalidParameter(format!(
                "row of {} pixels at {} bpp needs {} words",
                width,
                self.bits(),
                words
            ))
        })
    }
}

#[derive(Debug, Clone)]
struct Raster {
    width: u32,
    height: u32,
    depth: PixelDepth,
    wpl: u32,
    colormap: Option<PixColormap>,
    words: Vec<u32>,
}

impl Raster {
    fn zeroed(width: u32, height: u32, depth: PixelDepth, wpl: u32) -> Self {
        Raster {
            width,
            height,
            depth,
            wpl,
            colormap: None,
            words: vec![0u32; wpl as usize * height as usize],
        }
    }

    fn row_range(&self, y: u32) -> std::ops::Range<usize> {
        let start = y as usize * self.wpl as usize;
        start..start + self.wpl as usize
    }
}

/// Immutable, shareable image
///
/// # Examples
///
/// ```
/// use leptonica_core::{Pix, PixelDepth};
///
/// let surface = Pix::new(64, 48, PixelDepth::Bit16).unwrap();
/// assert_eq!(surface.width(), 64);
/// assert_eq!(surface.wpl(), 32);
/// ```
///
/// # See also
///
/// C Leptonica: `pixCreate()` in `pix1.c`
#[derive(Debug, Clone)]
pub struct Pix {
    inner: Arc<Raster>,
}

impl Pix {
    /// Create a zero-filled image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if either side is 0, or
    /// [`Error::InvalidParameter`] if a row would not fit in `u32` words.
    pub fn new(width: u32, height: u32, depth: PixelDepth) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let wpl = depth.words_per_line(width)?;
        Ok(Pix {
            inner: Arc::new(Raster::zeroed(width, height, depth, wpl)),
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    #[inline]
    pub fn depth(&self) -> PixelDepth {
        self.inner.depth
    }

    /// Row stride of [`Pix::data`] in 32-bit words.
    #[inline]
    pub fn wpl(&self) -> u32 {
        self.inner.wpl
    }

    #[inline]
    pub fn has_colormap(&self) -> bool {
        self.inner.colormap.is_some()
    }

    #[inline]
    pub fn colormap(&self) -> Option<&PixColormap> {
        self.inner.colormap.as_ref()
    }

    /// The packed words, `wpl * height` of them.
    #[inline]
    pub fn data(&self) -> &[u32] {
        &self.inner.words
    }

    /// Packed words of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_data(&self, y: u32) -> &[u32] {
        &self.inner.words[self.inner.row_range(y)]
    }

    /// Zero-filled image with the same size, depth and colormap.
    ///
    /// # See also
    ///
    /// C Leptonica: `pixCreateTemplate()` in `pix1.c`
    pub fn create_template(&self) -> Self {
        let src = &self.inner;
        let mut raster = Raster::zeroed(src.width, src.height, src.depth, src.wpl);
        raster.colormap = src.colormap.clone();
        Pix {
            inner: Arc::new(raster),
        }
    }

    /// Same width, height and depth.
    ///
    /// # See also
    ///
    /// C Leptonica: `pixSizesEqual()` in `pix1.c`
    pub fn sizes_equal(&self, other: &Pix) -> bool {
        self.width() == other.width()
            && self.height() == other.height()
            && self.depth() == other.depth()
    }

    /// Number of pixels with a nonzero value.
    ///
    /// # See also
    ///
    /// C Leptonica: `pixCountPixels()` in `pix3.c`
    pub fn count_nonzero(&self) -> u64 {
        (0..self.height())
            .map(|y| {
                (0..self.width())
                    .filter(|&x| self.get_pixel_unchecked(x, y) != 0)
                    .count() as u64
            })
            .sum()
    }

    /// Take exclusive ownership of the raster without copying.
    ///
    /// Fails, returning `self`, while other clones are alive.
    pub fn try_into_mut(self) -> std::result::Result<PixMut, Self> {
        Arc::try_unwrap(self.inner)
            .map(|inner| PixMut { inner })
            .map_err(|inner| Pix { inner })
    }

    /// Copy the raster into a new writable image.
    pub fn to_mut(&self) -> PixMut {
        PixMut {
            inner: Raster::clone(&self.inner),
        }
    }
}

/// Writable image
///
/// Exclusive access is enforced by ownership rather than reference counts.
/// Convert back with `Into<Pix>`.
#[derive(Debug)]
pub struct PixMut {
    inner: Raster,
}

impl PixMut {
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    #[inline]
    pub fn depth(&self) -> PixelDepth {
        self.inner.depth
    }

    #[inline]
    pub fn wpl(&self) -> u32 {
        self.inner.wpl
    }

    #[inline]
    pub fn data(&self) -> &[u32] {
        &self.inner.words
    }

    /// Packed words of row `y`, writable.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_data_mut(&mut self, y: u32) -> &mut [u32] {
        let range = self.inner.row_range(y);
        &mut self.inner.words[range]
    }

    #[inline]
    pub fn has_colormap(&self) -> bool {
        self.inner.colormap.is_some()
    }

    #[inline]
    pub fn colormap(&self) -> Option<&PixColormap> {
        self.inner.colormap.as_ref()
    }

    /// Attach or remove a colormap.
    ///
    /// # Errors
    ///
    /// - [`Error::ColormapNotAllowed`] above 8 bpp
    /// - [`Error::InvalidParameter`] if the colormap depth differs from the
    ///   image depth
    pub fn set_colormap(&mut self, cmap: Option<PixColormap>) -> Result<()> {
        if let Some(cm) = &cmap {
            let depth = self.inner.depth;
            if !depth.colormap_allowed() {
                return Err(Error::ColormapNotAllowed(depth.bits()));
            }
            if cm.depth() != depth.bits() {
                return Err(Error::InvalidParameter(format!(
                    "colormap depth {} does not match image depth {}",
                    cm.depth(),
                    depth.bits()
                )));
            }
        }
        self.inner.colormap = cmap;
        Ok(())
    }

    /// Fill every pixel with `val`, masked to the depth.
    ///
    /// # See also
    ///
    /// C Leptonica: `pixSetAllArbitrary()` in `pix2.c`
    pub fn set_all_arbitrary(&mut self, val: u32) {
        for y in 0..self.height() {
            for x in 0..self.width() {
                self.set_pixel_unchecked(x, y, val);
            }
        }
    }

    /// Paint a frame of the given widths with `color`.
    ///
    /// Widths larger than the image are clipped.
    ///
    /// # See also
    ///
    /// C Leptonica: `pixSetOrClearBorder()` in `pix2.c`
    pub fn set_or_clear_border(
        &mut self,
        left: u32,
        right: u32,
        top: u32,
        bot: u32,
        color: InitColor,
    ) {
        let val = match color {
            InitColor::Black => 0,
            InitColor::White => self.depth().max_value(),
        };
        let w = self.width();
        let h = self.height();
        let x_end = w.saturating_sub(right);
        let y_end = h.saturating_sub(bot);
        for y in 0..h {
            let full_row = y < top || y >= y_end;
            for x in 0..w {
                if full_row || x < left || x >= x_end {
                    self.set_pixel_unchecked(x, y, val);
                }
            }
        }
    }
}

impl From<PixMut> for Pix {
    fn from(pix_mut: PixMut) -> Self {
        Pix {
            inner: Arc::new(pix_mut.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_depth() {
        assert_eq!(PixelDepth::from_bits(16).unwrap(), PixelDepth::Bit16);
        assert!(matches!(
            PixelDepth::from_bits(3),
            Err(Error::InvalidDepth(3))
        ));
        assert_eq!(PixelDepth::Bit8.max_value(), 255);
        assert_eq!(PixelDepth::Bit16.max_value(), 65535);
        assert_eq!(PixelDepth::Bit32.max_value(), u32::MAX);
        assert!(PixelDepth::Bit8.colormap_allowed());
        assert!(!PixelDepth::Bit16.colormap_allowed());
    }

    #[test]
    fn test_new_and_stride() {
        let pix = Pix::new(100, 200, PixelDepth::Bit8).unwrap();
        assert_eq!((pix.width(), pix.height()), (100, 200));
        assert_eq!(pix.wpl(), 25);
        assert_eq!(pix.data().len(), 25 * 200);

        assert_eq!(Pix::new(32, 1, PixelDepth::Bit1).unwrap().wpl(), 1);
        assert_eq!(Pix::new(33, 1, PixelDepth::Bit1).unwrap().wpl(), 2);
        assert_eq!(Pix::new(5, 1, PixelDepth::Bit16).unwrap().wpl(), 3);
        assert_eq!(Pix::new(10, 1, PixelDepth::Bit32).unwrap().wpl(), 10);

        assert!(matches!(
            Pix::new(0, 4, PixelDepth::Bit8),
            Err(Error::InvalidDimension { .. })
        ));
    }

    #[test]
    fn test_mut_round_trip_shares_or_copies() {
        let pix = Pix::new(10, 10, PixelDepth::Bit8).unwrap();
        let shared = pix.clone();
        assert_eq!(pix.data().as_ptr(), shared.data().as_ptr());

        // A live clone blocks the zero-copy path
        let pix = pix.try_into_mut().unwrap_err();
        drop(shared);
        let mut pm = pix.try_into_mut().unwrap();
        pm.set_pixel(3, 4, 9).unwrap();
        let pix: Pix = pm.into();

        let copy = pix.to_mut();
        assert_ne!(copy.data().as_ptr(), pix.data().as_ptr());
        assert_eq!(copy.get_pixel(3, 4), Some(9));
    }

    #[test]
    fn test_create_template() {
        let mut pm = Pix::new(40, 30, PixelDepth::Bit8).unwrap().to_mut();
        pm.set_pixel(20, 10, 42).unwrap();
        let src: Pix = pm.into();

        let tmpl = src.create_template();
        assert!(tmpl.sizes_equal(&src));
        assert_eq!(tmpl.count_nonzero(), 0);
        assert_eq!(src.count_nonzero(), 1);
    }

    #[test]
    fn test_set_colormap_rules() {
        let cmap = PixColormap::new(8).unwrap();
        let mut pm = Pix::new(4, 4, PixelDepth::Bit32).unwrap().to_mut();
        assert!(matches!(
            pm.set_colormap(Some(cmap.clone())),
            Err(Error::ColormapNotAllowed(32))
        ));

        let mut pm = Pix::new(4, 4, PixelDepth::Bit4).unwrap().to_mut();
        assert!(pm.set_colormap(Some(cmap.clone())).is_err());

        let mut pm = Pix::new(4, 4, PixelDepth::Bit8).unwrap().to_mut();
        pm.set_colormap(Some(cmap)).unwrap();
        assert!(pm.has_colormap());
        pm.set_colormap(None).unwrap();
        assert!(!pm.has_colormap());
    }

    #[test]
    fn test_set_all_arbitrary_masks_value() {
        let mut pm = Pix::new(10, 10, PixelDepth::Bit8).unwrap().to_mut();
        pm.set_all_arbitrary(300);
        assert_eq!(pm.get_pixel(9, 9), Some(300 & 255));

        let mut pm = Pix::new(10, 10, PixelDepth::Bit1).unwrap().to_mut();
        pm.set_all_arbitrary(3);
        let pix: Pix = pm.into();
        assert_eq!(pix.count_nonzero(), 100);
    }

    #[test]
    fn test_set_or_clear_border() {
        let mut pm = Pix::new(20, 20, PixelDepth::Bit8).unwrap().to_mut();
        pm.set_or_clear_border(2, 2, 2, 2, InitColor::White);
        assert_eq!(pm.get_pixel(0, 0), Some(255));
        assert_eq!(pm.get_pixel(1, 10), Some(255));
        assert_eq!(pm.get_pixel(18, 10), Some(255));
        assert_eq!(pm.get_pixel(10, 19), Some(255));
        assert_eq!(pm.get_pixel(2, 2), Some(0));
        let pix: Pix = pm.into();
        assert_eq!(pix.count_nonzero(), 400 - 16 * 16);

        let mut pm = pix.to_mut();
        pm.set_or_clear_border(2, 2, 2, 2, InitColor::Black);
        let pix: Pix = pm.into();
        assert_eq!(pix.count_nonzero(), 0);
    }
}

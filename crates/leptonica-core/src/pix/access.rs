//! Pixel access functions
//!
//! Low-level functions for getting and setting individual pixels.
//! These correspond to Leptonica's `GET_DATA_*` and `SET_DATA_*` macros
//! in `arrayaccess.h`.
//!
//! # Pixel packing
//!
//! Pixels are packed MSB-to-LSB within each 32-bit word. For example,
//! in a 1-bit image, pixel 0 occupies bit 31 (MSB) of the first word.
//!
//! # See also
//!
//! C Leptonica: `arrayaccess.h` (macros), `pix2.c` (`pixGetPixel` / `pixSetPixel`)

use super::{Pix, PixMut, PixelDepth};
use crate::error::{Error, Result};

#[inline]
fn read_packed(line: &[u32], x: u32, depth: PixelDepth) -> u32 {
    match depth {
        PixelDepth::Bit1 => get_data_bit(line, x),
        PixelDepth::Bit2 => get_data_dibit(line, x),
        PixelDepth::Bit4 => get_data_qbit(line, x),
        PixelDepth::Bit8 => get_data_byte(line, x),
        PixelDepth::Bit16 => get_data_two_bytes(line, x),
        PixelDepth::Bit32 => line[x as usize],
    }
}

#[inline]
fn write_packed(line: &mut [u32], x: u32, depth: PixelDepth, val: u32) {
    match depth {
        PixelDepth::Bit1 => set_data_bit(line, x, val),
        PixelDepth::Bit2 => set_data_dibit(line, x, val),
        PixelDepth::Bit4 => set_data_qbit(line, x, val),
        PixelDepth::Bit8 => set_data_byte(line, x, val),
        PixelDepth::Bit16 => set_data_two_bytes(line, x, val),
        PixelDepth::Bit32 => line[x as usize] = val,
    }
}

fn out_of_bounds(x: u32, y: u32, width: u32, height: u32) -> Error {
    Error::IndexOutOfBounds {
        index: y as usize * width as usize + x as usize,
        len: width as usize * height as usize,
    }
}

impl Pix {
    /// Get a pixel value at (x, y).
    ///
    /// Returns `None` if coordinates are out of bounds.
    ///
    /// # See also
    ///
    /// C Leptonica: `pixGetPixel()` in `pix2.c`
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some(self.get_pixel_unchecked(x, y))
    }

    /// Get a pixel value without bounds checking.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`, or if `x` lies past the end of the row words.
    #[inline]
    pub fn get_pixel_unchecked(&self, x: u32, y: u32) -> u32 {
        read_packed(self.row_data(y), x, self.depth())
    }
}

impl PixMut {
    /// Get a pixel value at (x, y).
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some(self.get_pixel_unchecked(x, y))
    }

    /// Get a pixel value without bounds checking.
    #[inline]
    pub fn get_pixel_unchecked(&self, x: u32, y: u32) -> u32 {
        let wpl = self.wpl() as usize;
        let start = y as usize * wpl;
        read_packed(&self.data()[start..start + wpl], x, self.depth())
    }

    /// Set a pixel value at (x, y).
    ///
    /// The value is masked to the pixel depth.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if coordinates are out of bounds.
    ///
    /// # See also
    ///
    /// C Leptonica: `pixSetPixel()` in `pix2.c`
    pub fn set_pixel(&mut self, x: u32, y: u32, val: u32) -> Result<()> {
        if x >= self.width() || y >= self.height() {
            return Err(out_of_bounds(x, y, self.width(), self.height()));
        }
        self.set_pixel_unchecked(x, y, val);
        Ok(())
    }

    /// Set a pixel value without bounds checking.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`, or if `x` lies past the end of the row words.
    #[inline]
    pub fn set_pixel_unchecked(&mut self, x: u32, y: u32, val: u32) {
        let depth = self.depth();
        let val = val & depth.max_value();
        write_packed(self.row_data_mut(y), x, depth, val);
    }
}

/// Get a 1-bit pixel value.
///
/// Pixels are packed MSB to LSB within each 32-bit word.
///
/// # See also
///
/// C Leptonica: `GET_DATA_BIT` macro in `arrayaccess.h`
#[inline]
pub fn get_data_bit(line: &[u32], x: u32) -> u32 {
    (line[(x >> 5) as usize] >> (31 - (x & 31))) & 1
}

/// Set a 1-bit pixel value.
#[inline]
pub fn set_data_bit(line: &mut [u32], x: u32, val: u32) {
    let shift = 31 - (x & 31);
    let word = &mut line[(x >> 5) as usize];
    *word = (*word & !(1 << shift)) | ((val & 1) << shift);
}

/// Get a 2-bit pixel value.
///
/// # See also
///
/// C Leptonica: `GET_DATA_DIBIT` macro
#[inline]
pub fn get_data_dibit(line: &[u32], x: u32) -> u32 {
    (line[(x >> 4) as usize] >> (2 * (15 - (x & 15)))) & 3
}

/// Set a 2-bit pixel value.
#[inline]
pub fn set_data_dibit(line: &mut [u32], x: u32, val: u32) {
    let shift = 2 * (15 - (x & 15));
    let word = &mut line[(x >> 4) as usize];
    *word = (*word & !(3 << shift)) | ((val & 3) << shift);
}

/// Get a 4-bit pixel value.
///
/// # See also
///
/// C Leptonica: `GET_DATA_QBIT` macro
#[inline]
pub fn get_data_qbit(line: &[u32], x: u32) -> u32 {
    (line[(x >> 3) as usize] >> (4 * (7 - (x & 7)))) & 0xf
}

/// Set a 4-bit pixel value.
#[inline]
pub fn set_data_qbit(line: &mut [u32], x: u32, val: u32) {
    let shift = 4 * (7 - (x & 7));
    let word = &mut line[(x >> 3) as usize];
    *word = (*word & !(0xf << shift)) | ((val & 0xf) << shift);
}

/// Get an 8-bit pixel value.
///
/// # See also
///
/// C Leptonica: `GET_DATA_BYTE` macro
#[inline]
pub fn get_data_byte(line: &[u32], x: u32) -> u32 {
    (line[(x >> 2) as usize] >> (8 * (3 - (x & 3)))) & 0xff
}

/// Set an 8-bit pixel value.
#[inline]
pub fn set_data_byte(line: &mut [u32], x: u32, val: u32) {
    let shift = 8 * (3 - (x & 3));
    let word = &mut line[(x >> 2) as usize];
    *word = (*word & !(0xff << shift)) | ((val & 0xff) << shift);
}

/// Get a 16-bit pixel value.
///
/// # See also
///
/// C Leptonica: `GET_DATA_TWO_BYTES` macro
#[inline]
pub fn get_data_two_bytes(line: &[u32], x: u32) -> u32 {
    (line[(x >> 1) as usize] >> (16 * (1 - (x & 1)))) & 0xffff
}

/// Set a 16-bit pixel value.
#[inline]
pub fn set_data_two_bytes(line: &mut [u32], x: u32, val: u32) {
    let shift = 16 * (1 - (x & 1));
    let word = &mut line[(x >> 1) as usize];
    *word = (*word & !(0xffff << shift)) | ((val & 0xffff) << shift);
}

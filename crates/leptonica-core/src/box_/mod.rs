//! Box, Boxa - Axis-aligned rectangles
//!
//! Segmentation uses these for the bounding box of each basin mask.

use crate::error::{Error, Result};

/// Rectangle with its top-left corner at `(x, y)`
///
/// A plain `Copy` value; Leptonica's reference-counted `BOX` has no
/// counterpart here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Box {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Box {
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] for a negative width or height.
    ///
    /// # See also
    ///
    /// C Leptonica: `boxCreate()` in `boxbasic.c`
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Result<Self> {
        if w < 0 || h < 0 {
            return Err(Error::InvalidParameter(format!(
                "box size must be non-negative, got {}x{}",
                w, h
            )));
        }
        Ok(Self { x, y, w, h })
    }

    pub const fn new_unchecked(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// One past the last column.
    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    /// One past the last row.
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    #[inline]
    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        (self.x..self.right()).contains(&x) && (self.y..self.bottom()).contains(&y)
    }
}

/// Ordered list of boxes
///
/// # See also
///
/// C Leptonica: `boxaCreate()` in `boxbasic.c`
#[derive(Debug, Clone, Default)]
pub struct Boxa {
    boxes: Vec<Box>,
}

impl Boxa {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            boxes: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Box> {
        self.boxes.get(index)
    }

    pub fn push(&mut self, b: Box) {
        self.boxes.push(b);
    }

    pub fn boxes(&self) -> &[Box] {
        &self.boxes
    }
}

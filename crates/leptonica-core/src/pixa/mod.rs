//! Pixa - Arrays of Pix images
//!
//! Basin extraction returns one clipped mask per basin, each paired with
//! the box that places it in the source image.
//!
//! # See also
//!
//! C Leptonica: `pixabasic.c`

use crate::box_::{Box, Boxa};
use crate::pix::Pix;

/// Array of Pix images
///
/// # See also
///
/// C Leptonica: `struct Pixa` in `environ.h`, `pixaCreate()` in `pixabasic.c`
#[derive(Debug, Clone, Default)]
pub struct Pixa {
    pix: Vec<Pix>,
    boxa: Boxa,
}

impl Pixa {
    /// Create a new empty Pixa
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a Pixa with pre-allocated capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pix: Vec::with_capacity(capacity),
            boxa: Boxa::with_capacity(capacity),
        }
    }

    /// Get the number of Pix images
    #[inline]
    pub fn len(&self) -> usize {
        self.pix.len()
    }

    /// Check if empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pix.is_empty()
    }

    /// Get a reference to a Pix by index
    pub fn get(&self, index: usize) -> Option<&Pix> {
        self.pix.get(index)
    }

    /// Add a Pix to the array
    pub fn push(&mut self, pix: Pix) {
        self.pix.push(pix);
    }

    /// Add a Pix with an associated bounding box
    pub fn push_with_box(&mut self, pix: Pix, b: Box) {
        self.pix.push(pix);
        self.boxa.push(b);
    }

    /// Get the boxes
    pub fn boxa(&self) -> &Boxa {
        &self.boxa
    }

    /// Get the bounding box stored for a Pix, if any
    pub fn get_box(&self, index: usize) -> Option<Box> {
        self.boxa.get(index).copied()
    }

    /// Iterate over the Pix images
    pub fn iter(&self) -> std::slice::Iter<'_, Pix> {
        self.pix.iter()
    }
}

impl std::ops::Index<usize> for Pixa {
    type Output = Pix;

    fn index(&self, index: usize) -> &Self::Output {
        &self.pix[index]
    }
}

impl<'a> IntoIterator for &'a Pixa {
    type Item = &'a Pix;
    type IntoIter = std::slice::Iter<'a, Pix>;

    fn into_iter(self) -> Self::IntoIter {
        self.pix.iter()
    }
}

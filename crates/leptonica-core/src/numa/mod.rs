//! Numa - Numeric arrays
//!
//! Arrays of floating-point numbers, used here for per-basin
//! statistics such as final flood levels.
//!
//! # See also
//!
//! C Leptonica: `numabasic.c`, `numafunc1.c`

use crate::error::{Error, Result};

/// Array of floating-point numbers
///
/// # See also
///
/// C Leptonica: `struct Numa` in `environ.h`, `numaCreate()` in `numabasic.c`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Numa {
    data: Vec<f32>,
}

impl Numa {
    /// Create a new empty Numa
    ///
    /// # See also
    ///
    /// C Leptonica: `numaCreate()`
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Create a Numa with pre-allocated capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Create a Numa from a vector of values
    pub fn from_vec(data: Vec<f32>) -> Self {
        Self { data }
    }

    /// Create a Numa from a slice of f32 values
    pub fn from_slice(data: &[f32]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }

    /// Get the number of values
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get a value by index
    pub fn get(&self, index: usize) -> Option<f32> {
        self.data.get(index).copied()
    }

    /// Add a value to the end
    pub fn push(&mut self, val: f32) {
        self.data.push(val);
    }

    /// Set a value at index
    pub fn set(&mut self, index: usize, val: f32) -> Result<()> {
        let len = self.data.len();
        let slot = self
            .data
            .get_mut(index)
            .ok_or(Error::IndexOutOfBounds { index, len })?;
        *slot = val;
        Ok(())
    }

    /// Get the underlying data as a slice
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Minimum value and its index (first occurrence)
    ///
    /// # See also
    ///
    /// C Leptonica: `numaGetMin()`
    pub fn min(&self) -> Option<(f32, usize)> {
        let mut best: Option<(f32, usize)> = None;
        for (i, &v) in self.data.iter().enumerate() {
            if best.is_none_or(|(b, _)| v < b) {
                best = Some((v, i));
            }
        }
        best
    }

    /// Maximum value and its index (first occurrence)
    ///
    /// # See also
    ///
    /// C Leptonica: `numaGetMax()`
    pub fn max(&self) -> Option<(f32, usize)> {
        let mut best: Option<(f32, usize)> = None;
        for (i, &v) in self.data.iter().enumerate() {
            if best.is_none_or(|(b, _)| v > b) {
                best = Some((v, i));
            }
        }
        best
    }
}

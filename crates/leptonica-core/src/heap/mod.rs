//! Heap - Array-based priority queue
//!
//! A binary heap of keyed items that hands back the item with the smallest
//! (or largest) key first. The direction can be switched at run time; the
//! heap order is then rebuilt in place with [`Heap::resort`].
//!
//! Items with equal keys come out in the order they were added, in both
//! directions. Every item carries a sequence number assigned on insertion
//! that breaks key ties, so two runs over the same input always drain in
//! the same order.
//!
//! # See also
//!
//! C Leptonica: `heap.c` (`lheapCreate()`, `lheapAdd()`, `lheapRemove()`,
//! `lheapSort()`, `lheapSortStrictOrder()`, `lheapPrint()`)

use crate::error::{Error, Result};
use std::cmp::Ordering;

/// Initial capacity used when zero is requested.
const MIN_BUFFER_SIZE: usize = 20;

/// Extraction order of a [`Heap`]
///
/// # See also
///
/// C Leptonica: `L_SORT_INCREASING`, `L_SORT_DECREASING`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HeapDirection {
    /// Smallest key first
    #[default]
    Increasing,
    /// Largest key first
    Decreasing,
}

impl HeapDirection {
    /// Get the opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            HeapDirection::Increasing => HeapDirection::Decreasing,
            HeapDirection::Decreasing => HeapDirection::Increasing,
        }
    }
}

/// An entry of a [`Heap`]
#[derive(Debug, Clone, PartialEq)]
pub struct HeapItem<T> {
    /// Priority key
    pub key: f32,
    /// Caller data carried with the key
    pub payload: T,
    seq: u64,
}

impl<T> HeapItem<T> {
    /// Insertion sequence number (0 for the first item added to the heap).
    #[inline]
    pub fn sequence(&self) -> u64 {
        self.seq
    }
}

/// Priority queue over a payload type `T`
///
/// # Examples
///
/// ```
/// use leptonica_core::{Heap, HeapDirection};
///
/// let mut heap = Heap::new(0, HeapDirection::Increasing);
/// heap.add(5.0, 'a');
/// heap.add(1.0, 'b');
/// heap.add(3.0, 'c');
///
/// let keys: Vec<f32> = std::iter::from_fn(|| heap.remove().ok())
///     .map(|item| item.key)
///     .collect();
/// assert_eq!(keys, vec![1.0, 3.0, 5.0]);
/// ```
#[derive(Debug, Clone)]
pub struct Heap<T> {
    items: Vec<HeapItem<T>>,
    direction: HeapDirection,
    next_seq: u64,
}

impl<T> Heap<T> {
    /// Create an empty heap.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Initial size of the backing array; 0 selects a default
    /// * `direction` - Extraction order
    ///
    /// # See also
    ///
    /// C Leptonica: `lheapCreate()`
    pub fn new(capacity: usize, direction: HeapDirection) -> Self {
        let capacity = if capacity == 0 {
            MIN_BUFFER_SIZE
        } else {
            capacity
        };
        Self {
            items: Vec::with_capacity(capacity),
            direction,
            next_seq: 0,
        }
    }

    /// Create an empty heap with the default capacity.
    pub fn with_direction(direction: HeapDirection) -> Self {
        Self::new(0, direction)
    }

    /// Number of items in the heap.
    ///
    /// # See also
    ///
    /// C Leptonica: `lheapGetCount()`
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the heap holds no items.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Size of the backing array.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// Current extraction order.
    #[inline]
    pub fn direction(&self) -> HeapDirection {
        self.direction
    }

    /// Change the extraction order.
    ///
    /// The heap order is no longer valid afterwards; call [`Heap::resort`]
    /// before removing items.
    pub fn set_direction(&mut self, direction: HeapDirection) {
        self.direction = direction;
    }

    /// The backing array, in heap order.
    pub fn items(&self) -> &[HeapItem<T>] {
        &self.items
    }

    /// The item that [`Heap::remove`] would return next.
    pub fn peek(&self) -> Option<&HeapItem<T>> {
        self.items.first()
    }

    /// Add an item.
    ///
    /// The backing array doubles when full.
    ///
    /// # See also
    ///
    /// C Leptonica: `lheapAdd()`
    pub fn add(&mut self, key: f32, payload: T) {
        if self.items.len() == self.items.capacity() {
            let extra = self.items.capacity().max(MIN_BUFFER_SIZE);
            self.items.reserve_exact(extra);
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.items.push(HeapItem { key, payload, seq });
        self.swap_up(self.items.len() - 1);
    }

    /// Remove the top item: the smallest key when increasing, the largest
    /// when decreasing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyHeap`] if there is nothing to remove.
    ///
    /// # See also
    ///
    /// C Leptonica: `lheapRemove()`
    pub fn remove(&mut self) -> Result<HeapItem<T>> {
        if self.items.is_empty() {
            return Err(Error::EmptyHeap);
        }
        let top = self.items.swap_remove(0);
        if !self.items.is_empty() {
            self.swap_down(0);
        }
        Ok(top)
    }

    /// Rebuild the heap order for the current direction.
    ///
    /// Runs bottom-up over the existing array in O(n).
    ///
    /// # See also
    ///
    /// C Leptonica: `lheapSort()`
    pub fn resort(&mut self) {
        for index in (0..self.items.len() / 2).rev() {
            self.swap_down(index);
        }
    }

    /// Sort the backing array into the full extraction order.
    ///
    /// A totally ordered array is also a valid heap, so the heap can keep
    /// being used afterwards.
    ///
    /// # See also
    ///
    /// C Leptonica: `lheapSortStrictOrder()`
    pub fn sort_strict_order(&mut self) {
        let direction = self.direction;
        self.items.sort_by(|a, b| order(direction, a, b));
    }

    /// Write the heap contents (keys in array order) for debugging.
    ///
    /// # See also
    ///
    /// C Leptonica: `lheapPrint()`
    pub fn print(&self, writer: &mut impl std::io::Write) -> Result<()> {
        writeln!(
            writer,
            "Heap: count = {}, capacity = {}, direction = {:?}",
            self.items.len(),
            self.items.capacity(),
            self.direction
        )?;
        for (i, item) in self.items.iter().enumerate() {
            writeln!(writer, "  [{i}] key = {} (seq {})", item.key, item.seq)?;
        }
        Ok(())
    }

    fn precedes(&self, a: usize, b: usize) -> bool {
        order(self.direction, &self.items[a], &self.items[b]) == Ordering::Less
    }

    fn swap_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if !self.precedes(index, parent) {
                break;
            }
            self.items.swap(index, parent);
            index = parent;
        }
    }

    fn swap_down(&mut self, mut index: usize) {
        let n = self.items.len();
        loop {
            let left = 2 * index + 1;
            if left >= n {
                break;
            }
            let mut best = index;
            if self.precedes(left, best) {
                best = left;
            }
            let right = left + 1;
            if right < n && self.precedes(right, best) {
                best = right;
            }
            if best == index {
                break;
            }
            self.items.swap(index, best);
            index = best;
        }
    }
}

impl<T> Default for Heap<T> {
    fn default() -> Self {
        Self::with_direction(HeapDirection::Increasing)
    }
}

/// Extraction order of two items: key by direction, then insertion order.
fn order<T>(direction: HeapDirection, a: &HeapItem<T>, b: &HeapItem<T>) -> Ordering {
    let by_key = match direction {
        HeapDirection::Increasing => a.key.total_cmp(&b.key),
        HeapDirection::Decreasing => b.key.total_cmp(&a.key),
    };
    by_key.then(a.seq.cmp(&b.seq))
}

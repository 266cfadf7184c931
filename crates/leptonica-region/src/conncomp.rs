//! Pixel connectivity
//!
//! Neighbourhood definitions shared by the extrema detector, the seed
//! generator and the watershed flood. Neighbours are always enumerated in
//! raster order of their offsets, which keeps every traversal reproducible.

use crate::error::{RegionError, RegionResult};

/// 4-way offsets in raster order: up, left, right, down
const FOUR_WAY: [(i32, i32); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];

/// 8-way offsets in raster order
const EIGHT_WAY: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Connectivity type for neighbourhood traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectivityType {
    /// 4-way connectivity (up, down, left, right)
    #[default]
    FourWay,
    /// 8-way connectivity (includes diagonals)
    EightWay,
}

impl ConnectivityType {
    /// Convert a Leptonica-style neighbour count (4 or 8).
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::InvalidParameters`] for any other value.
    pub fn from_neighbors(n: u32) -> RegionResult<Self> {
        match n {
            4 => Ok(ConnectivityType::FourWay),
            8 => Ok(ConnectivityType::EightWay),
            _ => Err(RegionError::InvalidParameters(format!(
                "connectivity must be 4 or 8, got {n}"
            ))),
        }
    }

    /// Number of neighbours of an interior pixel.
    pub fn neighbor_count(self) -> u32 {
        match self {
            ConnectivityType::FourWay => 4,
            ConnectivityType::EightWay => 8,
        }
    }

    /// Neighbour offsets `(dx, dy)` in raster order.
    pub fn offsets(self) -> &'static [(i32, i32)] {
        match self {
            ConnectivityType::FourWay => &FOUR_WAY,
            ConnectivityType::EightWay => &EIGHT_WAY,
        }
    }

    /// Iterate over the in-image neighbours of `(x, y)` in raster order.
    pub fn neighbors(
        self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> impl Iterator<Item = (u32, u32)> {
        self.offsets().iter().filter_map(move |&(dx, dy)| {
            let nx = x as i64 + dx as i64;
            let ny = y as i64 + dy as i64;
            if nx < 0 || ny < 0 || nx >= width as i64 || ny >= height as i64 {
                None
            } else {
                Some((nx as u32, ny as u32))
            }
        })
    }
}

/// Whether `(x, y)` lies on the outermost row or column of the image.
#[inline]
pub(crate) fn on_border(x: u32, y: u32, width: u32, height: u32) -> bool {
    x == 0 || y == 0 || x + 1 == width || y + 1 == height
}

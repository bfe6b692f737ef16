//! Planar coordinates and straight-line distance.
//!
//! Distances are kept squared: the dispatcher only ever compares them, and the
//! ordering of squared distances matches the ordering of real ones.

use serde::{Deserialize, Serialize};

/// Integer grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl Coordinate {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Coordinate {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Squared Euclidean distance between two coordinates.
///
/// Computed in `i64`; any pair of coordinates within `±1_000_000_000` is exact.
pub fn squared_distance(a: Coordinate, b: Coordinate) -> i64 {
    let dx = i64::from(a.x) - i64::from(b.x);
    let dy = i64::from(a.y) - i64::from(b.y);
    dx * dx + dy * dy
}

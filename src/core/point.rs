//! Coordinate types for floor-local pixel space and the walkable grid.

use serde::{Deserialize, Serialize};

/// A point in floor-local pixel coordinates.
///
/// Every floor has its own pixel coordinate space shared by its corridor
/// polygons, door anchors, and query points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate in pixels
    pub x: f32,
    /// Y coordinate in pixels
    pub y: f32,
}

impl Point {
    /// Origin point (0, 0)
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    /// Create a new point.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[inline]
    pub fn distance(&self, other: &Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Integer cell indices into a floor's walkable grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCoord {
    /// Column index
    pub x: i32,
    /// Row index
    pub y: i32,
}

impl GridCoord {
    /// Create a new grid coordinate.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to another coordinate.
    #[inline]
    pub fn manhattan_distance(&self, other: &GridCoord) -> i32 {
        (other.x - self.x).abs() + (other.y - self.y).abs()
    }

    /// Chebyshev distance (max of axis deltas) to another coordinate.
    #[inline]
    pub fn chebyshev_distance(&self, other: &GridCoord) -> i32 {
        (other.x - self.x).abs().max((other.y - self.y).abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance(&b) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_grid_distances() {
        let a = GridCoord::new(1, 1);
        let b = GridCoord::new(4, -1);
        assert_eq!(a.manhattan_distance(&b), 5);
        assert_eq!(a.chebyshev_distance(&b), 3);
    }
}

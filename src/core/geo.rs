use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in world units or pixels, depending on context
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(&self, other: &Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    pub fn subtract(&self, other: &Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    pub fn multiply(&self, scalar: f64) -> Point {
        Point::new(self.x * scalar, self.y * scalar)
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Axis-aligned rectangle in world units (`min` is the top-left corner)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    pub min: Point,
    pub max: Point,
}

impl WorldBounds {
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// The whole square world of side `size`
    pub fn world(size: f64) -> Self {
        Self::new(Point::new(0.0, 0.0), Point::new(size, size))
    }

    pub fn contains(&self, point: &Point) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    /// Clamp a point into the rectangle
    pub fn clamp(&self, point: Point) -> Point {
        Point::new(
            point.x.clamp(self.min.x, self.max.x),
            point.y.clamp(self.min.y, self.max.y),
        )
    }
}

/// Address of one tile image at one resolution level.
///
/// Zoom 0 is the coarsest level, where a single tile covers the whole world;
/// each finer level splits every tile into four.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileAddress {
    pub zoom: u8,
    pub column: u32,
    pub row: u32,
}

impl TileAddress {
    pub fn new(zoom: u8, column: u32, row: u32) -> Self {
        Self { zoom, column, row }
    }

    /// The tile one zoom level coarser that covers this one, or `None` at zoom 0
    pub fn parent(&self) -> Option<TileAddress> {
        if self.zoom == 0 {
            None
        } else {
            Some(TileAddress::new(self.zoom - 1, self.column / 2, self.row / 2))
        }
    }

    /// Gets the four child tiles at the next finer zoom level
    pub fn children(&self) -> [TileAddress; 4] {
        let (z, c, r) = (self.zoom + 1, self.column * 2, self.row * 2);
        [
            TileAddress::new(z, c, r),
            TileAddress::new(z, c + 1, r),
            TileAddress::new(z, c, r + 1),
            TileAddress::new(z, c + 1, r + 1),
        ]
    }

    /// Checks that column and row fall inside the grid for this zoom level
    pub fn is_valid(&self) -> bool {
        match 1u64.checked_shl(self.zoom as u32) {
            Some(max_coord) => (self.column as u64) < max_coord && (self.row as u64) < max_coord,
            // Every u32 coordinate exists at zoom 64 and beyond
            None => true,
        }
    }

    /// Chain of ancestors from the parent up to zoom 0
    pub fn ancestors(&self) -> impl Iterator<Item = TileAddress> {
        std::iter::successors(self.parent(), |addr| addr.parent())
    }
}

impl fmt::Display for TileAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.column, self.row)
    }
}

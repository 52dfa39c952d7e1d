//! Common components used across multiple entity types.

use serde::{Deserialize, Serialize};

/// Integer grid coordinate. `y` is depth: it grows downward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn manhattan(&self, other: &Self) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    pub fn is_diagonal_to(&self, other: &Self) -> bool {
        self.x != other.x && self.y != other.y
    }
}

impl std::ops::Add for Coord {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl std::ops::Sub for Coord {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Inclusive rectangle of cells, as requested by a presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Viewport {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Build from two corners in any order
    pub fn from_corners(a: Coord, b: Coord) -> Self {
        Self {
            x1: a.x.min(b.x),
            y1: a.y.min(b.y),
            x2: a.x.max(b.x),
            y2: a.y.max(b.y),
        }
    }

    pub fn contains(&self, c: Coord) -> bool {
        c.x >= self.x1 && c.x <= self.x2 && c.y >= self.y1 && c.y <= self.y2
    }

    /// Cells in column-major order (x outer, y inner)
    pub fn cells(self) -> impl Iterator<Item = Coord> {
        let Viewport { x1, y1, x2, y2 } = self;
        (x1..=x2).flat_map(move |x| (y1..=y2).map(move |y| Coord::new(x, y)))
    }
}

/// Spatial position component - where an entity stands and where it wants to step next.
///
/// The intended direction is decided by behavior logic each tick and only
/// committed by locomotion if the destination cell is walkable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub x: i32,
    pub y: i32,
    pub dx: i32,
    pub dy: i32,
}

impl Location {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y, dx: 0, dy: 0 }
    }

    pub fn at(coord: Coord) -> Self {
        Self::new(coord.x, coord.y)
    }

    pub fn coord(&self) -> Coord {
        Coord::new(self.x, self.y)
    }

    /// Cell the entity would occupy if the intended step were committed
    pub fn intended(&self) -> Coord {
        Coord::new(self.x + self.dx, self.y + self.dy)
    }

    pub fn move_towards(&mut self, dx: i32, dy: i32) {
        self.dx = dx;
        self.dy = dy;
    }

    pub fn freeze(&mut self) {
        self.move_towards(0, 0);
    }

    pub fn is_still(&self) -> bool {
        self.dx == 0 && self.dy == 0
    }
}

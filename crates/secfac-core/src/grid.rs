//! The tile grid - per-cell structural state of the facility.
//!
//! Cells are created once and only ever change through [`Grid::dig`]. Digging
//! is one-way: a breached cell never becomes rock again.

use serde::{Deserialize, Serialize};

use crate::components::{Coord, Viewport};
use crate::config::FacilityConfig;

/// One tile of the facility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub depth: i32,
    pub solid: bool,
    pub resistance: u32,
}

impl Cell {
    /// Rock below the surface, open air at or above it. Rock always takes
    /// at least one stroke.
    pub fn new(depth: i32, surface_depth: i32, resistance: u32) -> Self {
        if depth > surface_depth {
            Self {
                depth,
                solid: true,
                resistance: resistance.max(1),
            }
        } else {
            Self {
                depth,
                solid: false,
                resistance: 0,
            }
        }
    }

    fn strike(&mut self) -> DigOutcome {
        if self.resistance == 0 {
            return DigOutcome::AlreadyOpen;
        }
        self.resistance -= 1;
        if self.resistance == 0 {
            self.solid = false;
            DigOutcome::Breached
        } else {
            DigOutcome::Weakened
        }
    }
}

/// What a single dig stroke did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigOutcome {
    /// Resistance went down but the cell is still rock
    Weakened,
    /// This stroke opened the cell
    Breached,
    /// The cell was already open
    AlreadyOpen,
    /// Coordinate is off the map; nothing happened
    OutOfBounds,
}

/// Fixed-size tile matrix, stored row-major
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    width: i32,
    height: i32,
    surface_depth: i32,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(width: i32, height: i32, surface_depth: i32, initial_resistance: u32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        let cells = (0..height)
            .flat_map(|y| (0..width).map(move |_| Cell::new(y, surface_depth, initial_resistance)))
            .collect();
        Self {
            width,
            height,
            surface_depth,
            cells,
        }
    }

    pub fn from_config(config: &FacilityConfig) -> Self {
        Self::new(
            config.width,
            config.height,
            config.surface_depth,
            config.initial_resistance,
        )
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Deepest row that was open from the start
    pub fn surface_depth(&self) -> i32 {
        self.surface_depth
    }

    pub fn in_bounds(&self, c: Coord) -> bool {
        c.x >= 0 && c.y >= 0 && c.x < self.width && c.y < self.height
    }

    fn index(&self, c: Coord) -> Option<usize> {
        self.in_bounds(c)
            .then(|| (c.y as usize) * (self.width as usize) + c.x as usize)
    }

    /// The part of `area` that lies on the map, if any
    pub fn clip(&self, area: Viewport) -> Option<Viewport> {
        let clipped = Viewport::new(
            area.x1.max(0),
            area.y1.max(0),
            area.x2.min(self.width - 1),
            area.y2.min(self.height - 1),
        );
        (clipped.x1 <= clipped.x2 && clipped.y1 <= clipped.y2).then_some(clipped)
    }

    pub fn cell(&self, c: Coord) -> Option<&Cell> {
        self.index(c).map(|i| &self.cells[i])
    }

    /// Off-map coordinates read as solid.
    pub fn is_solid(&self, c: Coord) -> bool {
        self.cell(c).map(|cell| cell.solid).unwrap_or(true)
    }

    pub fn depth_of(&self, c: Coord) -> Option<i32> {
        self.cell(c).map(|cell| cell.depth)
    }

    /// Apply one dig stroke. Out-of-bounds coordinates are ignored.
    pub fn dig(&mut self, c: Coord) -> DigOutcome {
        match self.index(c) {
            Some(i) => self.cells[i].strike(),
            None => DigOutcome::OutOfBounds,
        }
    }

    /// Number of open cells on the map
    pub fn open_cell_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.solid).count()
    }
}

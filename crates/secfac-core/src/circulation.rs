//! Circulation - walkability and pathfinding over the grid.
//!
//! `Circulation` borrows the [`Grid`] rather than caching a walk map, so every
//! query sees the current state of the rock. Paths are plain values: once
//! computed they are consumed step by step and never repaired.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::components::Coord;
use crate::grid::Grid;

/// Step costs in thousandths, so the open set can order on integers.
const ORTHOGONAL_COST: u32 = 1000;
const DIAGONAL_COST: u32 = 1414;

/// Neighbor offsets, row by row from the top-left
const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// A computed route. Holds the cells to step through, origin excluded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Path {
    steps: VecDeque<Coord>,
    cost: f32,
}

impl Path {
    fn from_cells(cells: Vec<Coord>, origin: Coord) -> Self {
        let mut cost = 0.0;
        let mut prev = origin;
        for &c in &cells {
            cost += if c.is_diagonal_to(&prev) {
                std::f32::consts::SQRT_2
            } else {
                1.0
            };
            prev = c;
        }
        Self {
            steps: cells.into(),
            cost,
        }
    }

    /// Take the next cell to step into
    pub fn next_step(&mut self) -> Option<Coord> {
        self.steps.pop_front()
    }

    pub fn destination(&self) -> Option<Coord> {
        self.steps.back().copied()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Total cost of the path as computed, orthogonal steps 1 and diagonals √2
    pub fn cost(&self) -> f32 {
        self.cost
    }

    pub fn steps(&self) -> impl Iterator<Item = &Coord> {
        self.steps.iter()
    }
}

/// Walkability queries over a borrowed grid
#[derive(Clone, Copy)]
pub struct Circulation<'a> {
    grid: &'a Grid,
}

impl<'a> Circulation<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        Self { grid }
    }

    pub fn is_walkable(&self, c: Coord) -> bool {
        self.grid.in_bounds(c) && !self.grid.is_solid(c)
    }

    /// The eight neighbors of a cell, without bounds filtering.
    ///
    /// Offsets saturate at the `i32` range, so cells at the extremes repeat
    /// instead of wrapping.
    pub fn surrounding(&self, c: Coord) -> [Coord; 8] {
        NEIGHBOR_OFFSETS.map(|(dx, dy)| Coord::new(c.x.saturating_add(dx), c.y.saturating_add(dy)))
    }

    /// Walkable neighbors, in the same order as [`Self::surrounding`]
    pub fn free_surrounding(&self, c: Coord) -> Vec<Coord> {
        self.surrounding(c)
            .into_iter()
            .filter(|&n| self.is_walkable(n))
            .collect()
    }

    /// The walkable cell next to `target` closest to `from`.
    ///
    /// Ties go to the first candidate in neighbor order.
    pub fn closest_free_neighbor(&self, from: Coord, target: Coord) -> Option<Coord> {
        let mut best: Option<(i32, Coord)> = None;
        for candidate in self.free_surrounding(target) {
            let distance = from.manhattan(&candidate);
            if best.map_or(true, |(d, _)| distance < d) {
                best = Some((distance, candidate));
            }
        }
        best.map(|(_, c)| c)
    }

    /// A* search from `origin` to `destination`.
    ///
    /// Returns `None` if the destination is not walkable or cannot be reached.
    /// A path to the origin itself is empty.
    pub fn compute_path(&self, origin: Coord, destination: Coord) -> Option<Path> {
        if !self.is_walkable(destination) {
            return None;
        }
        if origin == destination {
            return Some(Path::default());
        }

        let mut frontier = BinaryHeap::new();
        let mut came_from: HashMap<Coord, Coord> = HashMap::new();
        let mut cost_so_far: HashMap<Coord, u32> = HashMap::new();
        let mut sequence: u64 = 0;

        frontier.push(Reverse((heuristic(origin, destination), sequence, origin)));
        cost_so_far.insert(origin, 0);

        while let Some(Reverse((_, _, current))) = frontier.pop() {
            if current == destination {
                let mut cells = vec![current];
                let mut node = current;
                while let Some(&prev) = came_from.get(&node) {
                    if prev == origin {
                        break;
                    }
                    cells.push(prev);
                    node = prev;
                }
                cells.reverse();
                return Some(Path::from_cells(cells, origin));
            }

            let current_cost = cost_so_far.get(&current).copied().unwrap_or(u32::MAX);
            for next in self.surrounding(current) {
                if !self.is_walkable(next) {
                    continue;
                }
                let step = if next.is_diagonal_to(&current) {
                    DIAGONAL_COST
                } else {
                    ORTHOGONAL_COST
                };
                let new_cost = current_cost.saturating_add(step);
                if cost_so_far.get(&next).map_or(true, |&c| new_cost < c) {
                    cost_so_far.insert(next, new_cost);
                    came_from.insert(next, current);
                    sequence += 1;
                    let priority = new_cost.saturating_add(heuristic(next, destination));
                    frontier.push(Reverse((priority, sequence, next)));
                }
            }
        }

        None
    }
}

/// Octile distance, admissible for 8-way movement
fn heuristic(a: Coord, b: Coord) -> u32 {
    let dx = (a.x - b.x).unsigned_abs();
    let dy = (a.y - b.y).unsigned_abs();
    let (long, short) = if dx > dy { (dx, dy) } else { (dy, dx) };
    ORTHOGONAL_COST * long + (DIAGONAL_COST - ORTHOGONAL_COST) * short
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 10x10 grid, rows 0-3 open
    fn grid() -> Grid {
        Grid::new(10, 10, 3, 1)
    }

    #[test]
    fn test_walkable() {
        let grid = grid();
        let circ = Circulation::new(&grid);
        assert!(circ.is_walkable(Coord::new(0, 0)));
        assert!(circ.is_walkable(Coord::new(9, 3)));
        assert!(!circ.is_walkable(Coord::new(0, 4)));
        assert!(!circ.is_walkable(Coord::new(-1, 0)));
        assert!(!circ.is_walkable(Coord::new(10, 0)));
    }

    #[test]
    fn test_surrounding_is_unfiltered() {
        let grid = grid();
        let circ = Circulation::new(&grid);
        let around = circ.surrounding(Coord::new(0, 0));
        assert_eq!(around.len(), 8);
        assert_eq!(around[0], Coord::new(-1, -1));
        assert_eq!(around[7], Coord::new(1, 1));
    }

    #[test]
    fn test_free_surrounding_at_surface() {
        let grid = grid();
        let circ = Circulation::new(&grid);
        // Cell just below the surface: only the row above is open
        let free = circ.free_surrounding(Coord::new(5, 4));
        assert_eq!(free, vec![Coord::new(4, 3), Coord::new(5, 3), Coord::new(6, 3)]);
        // Deep rock has no free neighbors
        assert!(circ.free_surrounding(Coord::new(5, 8)).is_empty());
    }

    #[test]
    fn test_closest_free_neighbor() {
        let grid = grid();
        let circ = Circulation::new(&grid);
        assert_eq!(
            circ.closest_free_neighbor(Coord::new(5, 2), Coord::new(5, 4)),
            Some(Coord::new(5, 3))
        );
        assert_eq!(
            circ.closest_free_neighbor(Coord::new(0, 3), Coord::new(5, 4)),
            Some(Coord::new(4, 3))
        );
        assert_eq!(circ.closest_free_neighbor(Coord::new(0, 0), Coord::new(5, 8)), None);
    }

    #[test]
    fn test_surrounding_saturates_at_extremes() {
        let grid = grid();
        let circ = Circulation::new(&grid);
        let around = circ.surrounding(Coord::new(i32::MAX, i32::MIN));
        assert_eq!(around[0], Coord::new(i32::MAX - 1, i32::MIN));
        assert_eq!(around[7], Coord::new(i32::MAX, i32::MIN + 1));
        assert!(circ.free_surrounding(Coord::new(i32::MAX, 10)).is_empty());
        assert_eq!(circ.closest_free_neighbor(Coord::new(0, 3), Coord::new(i32::MAX, 10)), None);
    }

    #[test]
    fn test_closest_free_neighbor_tie_goes_to_first() {
        let mut grid = grid();
        grid.dig(Coord::new(4, 4));
        grid.dig(Coord::new(6, 4));
        let circ = Circulation::new(&grid);
        // (4,4) and (6,4) are both 5 away from (5,0)
        assert_eq!(
            circ.closest_free_neighbor(Coord::new(5, 0), Coord::new(5, 5)),
            Some(Coord::new(4, 4))
        );
    }

    #[test]
    fn test_straight_path() {
        let grid = grid();
        let circ = Circulation::new(&grid);
        let path = circ.compute_path(Coord::new(0, 3), Coord::new(4, 3)).unwrap();
        assert_eq!(path.len(), 4);
        assert_eq!(path.destination(), Some(Coord::new(4, 3)));
        assert!((path.cost() - 4.0).abs() < 0.001);
    }

    #[test]
    fn test_diagonal_path_is_cheaper() {
        let grid = grid();
        let circ = Circulation::new(&grid);
        let path = circ.compute_path(Coord::new(0, 0), Coord::new(3, 3)).unwrap();
        assert_eq!(path.len(), 3);
        assert!((path.cost() - 3.0 * std::f32::consts::SQRT_2).abs() < 0.001);
    }

    #[test]
    fn test_same_cell_path_is_empty() {
        let grid = grid();
        let circ = Circulation::new(&grid);
        let path = circ.compute_path(Coord::new(2, 2), Coord::new(2, 2)).unwrap();
        assert!(path.is_empty());
    }

    #[test]
    fn test_no_path_into_rock() {
        let grid = grid();
        let circ = Circulation::new(&grid);
        assert_eq!(circ.compute_path(Coord::new(0, 3), Coord::new(5, 6)), None);
        assert_eq!(circ.compute_path(Coord::new(0, 3), Coord::new(50, 0)), None);
    }

    #[test]
    fn test_path_sees_fresh_digs() {
        let mut grid = grid();
        let pocket = Coord::new(5, 5);
        while grid.is_solid(pocket) {
            grid.dig(pocket);
        }
        // Pocket is open but sealed off
        assert_eq!(
            Circulation::new(&grid).compute_path(Coord::new(0, 3), pocket),
            None
        );

        grid.dig(Coord::new(5, 4));
        let path = Circulation::new(&grid)
            .compute_path(Coord::new(0, 3), pocket)
            .unwrap();
        assert_eq!(path.destination(), Some(pocket));
    }

    #[test]
    fn test_path_routes_around_rock() {
        // Sealed U-shaped tunnel: down x=1, across row 7, up x=5
        let mut grid = grid();
        for y in 5..=7 {
            grid.dig(Coord::new(1, y));
            grid.dig(Coord::new(5, y));
        }
        for x in 2..5 {
            grid.dig(Coord::new(x, 7));
        }

        let circ = Circulation::new(&grid);
        let path = circ.compute_path(Coord::new(1, 5), Coord::new(5, 5)).unwrap();
        let steps: Vec<_> = path.steps().copied().collect();
        assert_eq!(steps.last(), Some(&Coord::new(5, 5)));
        assert!(steps.contains(&Coord::new(3, 7)));
        assert!(steps.iter().all(|&c| circ.is_walkable(c)));
        assert_eq!(steps.len(), 6);
    }

    #[test]
    fn test_next_step_consumes() {
        let grid = grid();
        let circ = Circulation::new(&grid);
        let mut path = circ.compute_path(Coord::new(0, 3), Coord::new(2, 3)).unwrap();
        assert_eq!(path.next_step(), Some(Coord::new(1, 3)));
        assert_eq!(path.next_step(), Some(Coord::new(2, 3)));
        assert_eq!(path.next_step(), None);
        assert!(path.is_empty());
    }
}

//! Elevator component and its dispatch decision.
//!
//! Floors are rows of the grid, so a larger floor number is deeper. `Down`
//! moves the cabin toward larger floors.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Direction of cabin travel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward smaller floor numbers
    Up,
    /// Toward larger floor numbers
    Down,
    #[default]
    Idle,
}

impl Direction {
    /// Row delta for one step, screen-Y convention
    pub fn dy(&self) -> i32 {
        match self {
            Direction::Up => -1,
            Direction::Down => 1,
            Direction::Idle => 0,
        }
    }

    pub fn reversed(&self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Idle => Direction::Idle,
        }
    }

    pub fn is_moving(&self) -> bool {
        *self != Direction::Idle
    }
}

/// Elevator component - a vertical transport serving a set of floors
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Elevator {
    pub serviced_floors: BTreeSet<i32>,
    pub call_requests: BTreeSet<i32>,
    pub destination_requests: BTreeSet<i32>,
    pub cabin_floor: i32,
    pub direction: Direction,
}

impl Elevator {
    /// A new elevator with its cabin parked at `cabin_floor`
    pub fn new(cabin_floor: i32) -> Self {
        Self {
            cabin_floor,
            ..Default::default()
        }
    }

    pub fn with_floors(mut self, floors: impl IntoIterator<Item = i32>) -> Self {
        for floor in floors {
            self.add_floor(floor);
        }
        self
    }

    pub fn add_floor(&mut self, floor: i32) {
        self.serviced_floors.insert(floor);
    }

    pub fn can_go_to(&self, floor: i32) -> bool {
        self.serviced_floors.contains(&floor)
    }

    /// Someone waiting at `floor` wants the cabin
    pub fn call(&mut self, floor: i32) {
        self.call_requests.insert(floor);
    }

    /// Someone in the cabin wants to get off at `floor`.
    ///
    /// Callers check [`Self::can_go_to`] first; this does not filter.
    pub fn request_destination(&mut self, floor: i32) {
        self.destination_requests.insert(floor);
    }

    pub fn is_called_or_has_destination(&self) -> bool {
        !self.call_requests.is_empty() || !self.destination_requests.is_empty()
    }

    fn requests(&self) -> impl Iterator<Item = &i32> {
        self.call_requests.iter().chain(self.destination_requests.iter())
    }

    pub fn has_request_at(&self, floor: i32) -> bool {
        self.call_requests.contains(&floor) || self.destination_requests.contains(&floor)
    }

    /// Is any request strictly beyond the cabin in `direction`?
    pub fn has_request_ahead(&self, direction: Direction) -> bool {
        let cabin = self.cabin_floor;
        match direction {
            Direction::Up => self.requests().any(|&f| f < cabin),
            Direction::Down => self.requests().any(|&f| f > cabin),
            Direction::Idle => false,
        }
    }

    /// Cabin reached `floor`: clear whatever was waiting for it
    pub fn arrives_at(&mut self, floor: i32) {
        self.cabin_floor = floor;
        self.call_requests.remove(&floor);
        self.destination_requests.remove(&floor);
    }

    /// Where should the cabin head next?
    ///
    /// Keeps going while anything is ahead, reverses when the only work is
    /// behind, and stops when there is nothing to do. From a standstill it
    /// heads toward the side with more requests, ties going down.
    pub fn decide_next_direction(&self) -> Direction {
        if self.direction.is_moving() {
            if self.has_request_ahead(self.direction) {
                return self.direction;
            }
            if self.is_called_or_has_destination() {
                return self.direction.reversed();
            }
            return Direction::Idle;
        }

        if !self.is_called_or_has_destination() {
            return Direction::Idle;
        }

        let cabin = self.cabin_floor;
        let above = self.requests().filter(|&&f| f < cabin).count();
        let below = self.requests().filter(|&&f| f > cabin).count();
        if above > below {
            Direction::Up
        } else {
            Direction::Down
        }
    }
}

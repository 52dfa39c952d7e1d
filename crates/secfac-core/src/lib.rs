//! SecFac Core - Underground Facility Simulation Engine
//!
//! A tick-driven simulation of a facility dug into rock: workers pick up dig
//! orders, walk to them and chip away at the tiles, while elevators shuttle
//! between the floors they serve.
//!
//! # Architecture
//!
//! Employees and elevators live in an ECS `World` via `hecs`:
//! - **Entities**: employees, elevators
//! - **Components**: pure data (`Location`, `Employee`, `Behavior`, `Elevator`)
//! - **Systems**: per-tick logic (`staff_system`, `dispatch_system`)
//!
//! Around the world sit the [`grid::Grid`] of tiles, the [`ledger::TaskLedger`]
//! of work orders and the [`circulation::Circulation`] pathfinding queries.
//!
//! # Example
//!
//! ```rust,no_run
//! use secfac_core::prelude::*;
//!
//! let mut facility = Facility::new(FacilityConfig::default());
//! let mut commands = CommandQueue::new();
//! commands.push(Command::recruit("worker"));
//! commands.push(Command::Dig(Coord::new(3, 5)));
//!
//! loop {
//!     facility.update(1.0 / 60.0, &mut commands).unwrap();
//! }
//! ```

pub mod circulation;
pub mod commands;
pub mod components;
pub mod config;
pub mod error;
pub mod facility;
pub mod grid;
pub mod ledger;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::commands::{Command, CommandQueue};
    pub use crate::components::*;
    pub use crate::config::FacilityConfig;
    pub use crate::error::FacilityError;
    pub use crate::facility::{ElevatorView, Facility, StaffView};
    pub use crate::ledger::{TaskId, TaskKind, TaskState};
}

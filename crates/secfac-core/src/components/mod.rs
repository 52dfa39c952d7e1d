//! Component definitions for the ECS simulation.
//!
//! Components are pure data structs attached to entities.
//! They have no behavior - that lives in systems.

mod common;
mod elevator;
mod staff;

pub use common::*;
pub use elevator::*;
pub use staff::*;

//! Facility configuration.

use serde::{Deserialize, Serialize};

use crate::components::Coord;
use crate::error::Result;

/// Configuration for a new facility
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FacilityConfig {
    /// Map width in cells
    pub width: i32,
    /// Map height in cells (deepest row is `height - 1`)
    pub height: i32,
    /// Deepest row that starts open. Everything below is rock.
    pub surface_depth: i32,
    /// Dig strokes needed to breach a rock cell
    pub initial_resistance: u32,
    /// Seconds of accumulated time per simulation tick
    pub tick_interval: f32,
    /// Where new recruits show up
    pub hire_position: Coord,
    /// Ticks an idle agent waits after failing to reach a task
    pub retry_cooldown_ticks: u32,
    /// Seed for the wander RNG. `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for FacilityConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 50,
            surface_depth: 3,
            initial_resistance: 5,
            tick_interval: 0.5,
            hire_position: Coord::new(0, 3),
            retry_cooldown_ticks: 4,
            seed: None,
        }
    }
}

impl FacilityConfig {
    /// Parse a config from JSON. Missing fields fall back to defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

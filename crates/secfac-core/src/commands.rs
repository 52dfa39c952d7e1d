//! Commands - player orders queued for the facility.
//!
//! The caller owns a [`CommandQueue`] and hands it to the facility each
//! update. Commands are drained oldest first at the start of the next tick.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::components::Coord;

/// An order for the facility
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// Queue a dig at one cell
    Dig(Coord),
    /// Queue digs over a rectangle, inclusive. Cells off the map are skipped.
    DigArea { from: Coord, to: Coord },
    /// Hire an employee by role name
    Recruit(String),
    /// Build an elevator shaft at `shaft`, serving `floors`
    BuildElevator { shaft: Coord, floors: Vec<i32> },
    /// Someone waiting at `floor` calls elevator `elevator`
    CallElevator { elevator: usize, floor: i32 },
    /// Someone in the cabin asks for `floor`
    SendElevator { elevator: usize, floor: i32 },
}

impl Command {
    pub fn recruit(role: impl Into<String>) -> Self {
        Command::Recruit(role.into())
    }
}

/// FIFO of pending commands
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommandQueue {
    commands: VecDeque<Command>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: Command) {
        self.commands.push_back(command);
    }

    pub fn extend(&mut self, commands: impl IntoIterator<Item = Command>) {
        self.commands.extend(commands);
    }

    /// Take everything queued so far, oldest first
    pub fn drain(&mut self) -> impl Iterator<Item = Command> + '_ {
        self.commands.drain(..)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

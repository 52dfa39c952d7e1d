//! Staff components: Employee, Role and the per-agent Behavior state.

use serde::{Deserialize, Serialize};

use crate::circulation::Path;
use crate::error::FacilityError;
use crate::ledger::{TaskId, TaskKind};

/// Marker component identifying an entity as a hired employee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub role: Role,
}

impl Employee {
    pub fn new(role: Role) -> Self {
        Self { role }
    }
}

/// Jobs an employee can be hired for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Worker,
    Security,
    Research,
}

impl Role {
    /// Which task kinds this role picks up
    pub fn task_kinds(&self) -> &'static [TaskKind] {
        match self {
            Role::Worker => &[TaskKind::Dig],
            Role::Security => &[],
            Role::Research => &[],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Role::Worker => "worker",
            Role::Security => "security",
            Role::Research => "research",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = FacilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "worker" => Ok(Role::Worker),
            "security" => Ok(Role::Security),
            "research" => Ok(Role::Research),
            _ => Err(FacilityError::InvalidEmployeeRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// What an agent is currently doing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BehaviorState {
    /// No work: wander around
    #[default]
    Idle,
    /// Walking a path toward a claimed task
    MovingToTask,
    /// Standing next to the task, applying its effect
    PerformingTask,
}

/// Behavior component - the agent's state machine data
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Behavior {
    pub state: BehaviorState,
    /// Task claimed in the ledger. The ledger owns the task itself.
    pub current_task: Option<TaskId>,
    pub current_path: Option<Path>,
    /// Ticks left before an idle agent looks for work again
    pub retry_cooldown: u32,
}

impl Behavior {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_idle(&self) -> bool {
        self.state == BehaviorState::Idle
    }

    /// Drop task and path, go back to wandering
    pub fn back_to_idleness(&mut self) {
        self.state = BehaviorState::Idle;
        self.current_task = None;
        self.current_path = None;
    }

    pub fn start_moving(&mut self, task: TaskId, path: Path) {
        self.state = BehaviorState::MovingToTask;
        self.current_task = Some(task);
        self.current_path = Some(path);
        self.retry_cooldown = 0;
    }
}

//! Task ledger - pending and in-progress work orders.
//!
//! Tasks are offered first-come first-served. An agent claims a task
//! (Pending -> InProgress), then either completes it (removed) or abandons
//! it (back to Pending, keeping its place in line).

use serde::{Deserialize, Serialize};

use crate::components::{Coord, Role, Viewport};
use crate::error::{FacilityError, Result};

/// Stable handle on a task. Agents hold these, the ledger owns the task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(pub u64);

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Kinds of work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskKind {
    Dig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskState {
    Pending,
    InProgress,
}

/// A unit of work at a coordinate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub kind: TaskKind,
    pub target: Coord,
    pub state: TaskState,
}

impl Task {
    pub fn is_pending(&self) -> bool {
        self.state == TaskState::Pending
    }

    pub fn is_in_progress(&self) -> bool {
        self.state == TaskState::InProgress
    }
}

/// Work order book, stored in the facility
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskLedger {
    tasks: Vec<Task>,
    next_id: u64,
    /// Digs at or above this row are rejected
    surface_depth: i32,
}

impl TaskLedger {
    pub fn new(surface_depth: i32) -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 0,
            surface_depth,
        }
    }

    /// Whether a task of this kind may target `target` at all
    pub fn accepts(&self, kind: TaskKind, target: Coord) -> bool {
        match kind {
            TaskKind::Dig => target.y > self.surface_depth,
        }
    }

    /// Add a pending task. Returns `None` if the target is rejected
    /// (e.g. a dig above ground).
    ///
    /// The same kind and target may be queued more than once.
    pub fn enqueue(&mut self, kind: TaskKind, target: Coord) -> Option<TaskId> {
        if !self.accepts(kind, target) {
            return None;
        }
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push(Task {
            id,
            kind,
            target,
            state: TaskState::Pending,
        });
        Some(id)
    }

    /// Pending tasks a given role can take, oldest first
    pub fn tasks_of_kind_for(&self, role: Role) -> Vec<&Task> {
        let kinds = role.task_kinds();
        self.tasks
            .iter()
            .filter(|t| t.is_pending() && kinds.contains(&t.kind))
            .collect()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: TaskId) -> Result<&mut Task> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(FacilityError::UnknownTask(id))
    }

    /// Pending -> InProgress. Fails if someone already holds the task.
    pub fn claim(&mut self, id: TaskId) -> Result<()> {
        let task = self.get_mut(id)?;
        if !task.is_pending() {
            return Err(FacilityError::TaskNotPending(id));
        }
        task.state = TaskState::InProgress;
        Ok(())
    }

    /// Remove a finished task
    pub fn complete(&mut self, id: TaskId) -> Result<Task> {
        let idx = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(FacilityError::UnknownTask(id))?;
        if !self.tasks[idx].is_in_progress() {
            return Err(FacilityError::TaskNotInProgress(id));
        }
        Ok(self.tasks.remove(idx))
    }

    /// InProgress -> Pending, for work that could not be reached
    pub fn abandon(&mut self, id: TaskId) -> Result<()> {
        let task = self.get_mut(id)?;
        if !task.is_in_progress() {
            return Err(FacilityError::TaskNotInProgress(id));
        }
        task.state = TaskState::Pending;
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn pending(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| t.is_pending())
    }

    pub fn in_progress(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| t.is_in_progress())
    }

    pub fn pending_in(&self, viewport: Viewport) -> Vec<&Task> {
        self.pending().filter(|t| viewport.contains(t.target)).collect()
    }

    pub fn in_progress_in(&self, viewport: Viewport) -> Vec<&Task> {
        self.in_progress()
            .filter(|t| viewport.contains(t.target))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.pending().count()
    }

    pub fn in_progress_count(&self) -> usize {
        self.in_progress().count()
    }
}

//! Error taxonomy for the facility core.
//!
//! Only conditions that indicate a scheduling bug or a bad caller request are
//! errors. Expected simulation outcomes (no path, no task, digging outside
//! the map) are modelled as plain return values instead.

use thiserror::Error;

use crate::ledger::TaskId;

#[derive(Error, Debug)]
pub enum FacilityError {
    #[error("task {0} is not pending")]
    TaskNotPending(TaskId),

    #[error("task {0} is not in progress")]
    TaskNotInProgress(TaskId),

    #[error("task {0} is not in the ledger")]
    UnknownTask(TaskId),

    #[error("invalid employee role: {0:?}")]
    InvalidEmployeeRole(String),

    #[error("elevator {elevator} does not service floor {floor}")]
    UnservicedFloor { elevator: usize, floor: i32 },

    #[error("no elevator with index {0}")]
    UnknownElevator(usize),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FacilityError>;

//! Systems - logic that operates on components

mod behavior;
mod dispatch;
mod locomotion;

pub use behavior::*;
pub use dispatch::*;
pub use locomotion::*;

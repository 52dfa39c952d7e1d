//! Behavior system - the per-agent state machine.
//!
//! Idle agents look for work their role can do and wander when there is none.
//! Once a task is claimed the agent walks a path to a free cell next to it,
//! then applies the task effect until it is done.

use hecs::{Entity, World};
use rand::Rng;

use super::locomotion::commit_step;
use crate::circulation::{Circulation, Path};
use crate::components::{Behavior, BehaviorState, Coord, Employee, Location, Role};
use crate::error::Result;
use crate::grid::{DigOutcome, Grid};
use crate::ledger::{TaskKind, TaskLedger};

/// Advance every agent in `roster` by one tick: behavior first, then its step.
///
/// Agents run in roster order, so an earlier agent's claim or dig is visible
/// to the ones after it within the same tick.
pub fn staff_system(
    world: &mut World,
    roster: &[Entity],
    grid: &mut Grid,
    ledger: &mut TaskLedger,
    rng: &mut impl Rng,
    retry_cooldown_ticks: u32,
) -> Result<()> {
    for &entity in roster {
        let Ok((employee, location, behavior)) =
            world.query_one_mut::<(&Employee, &mut Location, &mut Behavior)>(entity)
        else {
            continue;
        };
        let role = employee.role;
        advance_agent(role, location, behavior, grid, ledger, rng, retry_cooldown_ticks)?;
        commit_step(location, grid);
    }
    Ok(())
}

/// Run one tick of a single agent's state machine
pub fn advance_agent(
    role: Role,
    location: &mut Location,
    behavior: &mut Behavior,
    grid: &mut Grid,
    ledger: &mut TaskLedger,
    rng: &mut impl Rng,
    retry_cooldown_ticks: u32,
) -> Result<()> {
    match behavior.state {
        BehaviorState::Idle => {
            look_for_work(role, location, behavior, grid, ledger, rng, retry_cooldown_ticks)
        }
        BehaviorState::MovingToTask => {
            follow_path(location, behavior);
            Ok(())
        }
        BehaviorState::PerformingTask => perform_task(location, behavior, grid, ledger),
    }
}

fn look_for_work(
    role: Role,
    location: &mut Location,
    behavior: &mut Behavior,
    grid: &Grid,
    ledger: &mut TaskLedger,
    rng: &mut impl Rng,
    retry_cooldown_ticks: u32,
) -> Result<()> {
    if behavior.retry_cooldown > 0 {
        behavior.retry_cooldown -= 1;
        wander(location, rng);
        return Ok(());
    }

    let candidates: Vec<_> = ledger
        .tasks_of_kind_for(role)
        .iter()
        .map(|t| (t.id, t.target))
        .collect();
    if candidates.is_empty() {
        wander(location, rng);
        return Ok(());
    }

    for (task_id, target) in candidates {
        let Some(path) = plan_route(location.coord(), target, grid) else {
            log::debug!("Task {} at {} is unreachable from {}", task_id, target, location.coord());
            continue;
        };
        ledger.claim(task_id)?;
        log::debug!(
            "{} at {} took task {} at {}, {} steps (cost {:.1})",
            role,
            location.coord(),
            task_id,
            target,
            path.len(),
            path.cost()
        );
        location.freeze();
        behavior.start_moving(task_id, path);
        return Ok(());
    }

    behavior.back_to_idleness();
    behavior.retry_cooldown = retry_cooldown_ticks;
    wander(location, rng);
    Ok(())
}

/// Path to the closest free cell next to `target`, if one can be reached
pub fn plan_route(from: Coord, target: Coord, grid: &Grid) -> Option<Path> {
    let circulation = Circulation::new(grid);
    let spot = circulation.closest_free_neighbor(from, target)?;
    log::debug!("Looking for a path between {} and {}", from, spot);
    circulation.compute_path(from, spot)
}

/// Random idle drift: keep heading, pick a horizontal heading, or stop
pub fn wander(location: &mut Location, rng: &mut impl Rng) {
    match rng.gen_range(0..3) {
        1 => {
            let dx = if rng.gen_bool(0.5) { 1 } else { -1 };
            location.move_towards(dx, 0);
        }
        2 => location.freeze(),
        _ => {}
    }
}

fn follow_path(location: &mut Location, behavior: &mut Behavior) {
    let next = behavior.current_path.as_mut().and_then(Path::next_step);
    match next {
        Some(step) => location.move_towards(step.x - location.x, step.y - location.y),
        None => {
            behavior.current_path = None;
            location.freeze();
            if behavior.current_task.is_some() {
                behavior.state = BehaviorState::PerformingTask;
            } else {
                behavior.back_to_idleness();
            }
        }
    }
}

fn perform_task(
    location: &mut Location,
    behavior: &mut Behavior,
    grid: &mut Grid,
    ledger: &mut TaskLedger,
) -> Result<()> {
    location.freeze();
    let Some(task_id) = behavior.current_task else {
        behavior.back_to_idleness();
        return Ok(());
    };
    let Some(task) = ledger.get(task_id) else {
        log::warn!("Task {} vanished from the ledger mid-work", task_id);
        behavior.back_to_idleness();
        return Ok(());
    };

    let finished = match task.kind {
        TaskKind::Dig => grid.dig(task.target) != DigOutcome::Weakened,
    };

    if finished {
        let task = ledger.complete(task_id)?;
        log::info!("Task {} ({:?} at {}) complete", task.id, task.kind, task.target);
        behavior.back_to_idleness();
    }
    Ok(())
}

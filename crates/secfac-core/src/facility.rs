//! Facility - main entry point for running the simulation

use hecs::{Entity, World};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::commands::{Command, CommandQueue};
use crate::components::*;
use crate::config::FacilityConfig;
use crate::error::{FacilityError, Result};
use crate::grid::Grid;
use crate::ledger::{Task, TaskId, TaskKind, TaskLedger};
use crate::systems::{dispatch_system, staff_system};

/// Read-only view of an employee, for presentation layers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaffView {
    pub entity: Entity,
    pub role: Role,
    pub position: Coord,
    pub state: BehaviorState,
}

/// Read-only view of an elevator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElevatorView {
    pub index: usize,
    pub shaft: Coord,
    pub cabin_floor: i32,
    pub direction: Direction,
}

/// The simulated facility
pub struct Facility {
    /// ECS world holding employees and elevators
    pub world: World,
    grid: Grid,
    ledger: TaskLedger,
    /// Employees in hiring order
    roster: Vec<Entity>,
    /// Elevators in construction order
    shafts: Vec<Entity>,
    config: FacilityConfig,
    rng: StdRng,
    accumulator: f32,
    ticks: u64,
}

impl Facility {
    /// Create a facility with untouched rock below the surface
    pub fn new(config: FacilityConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            world: World::new(),
            grid: Grid::from_config(&config),
            ledger: TaskLedger::new(config.surface_depth),
            roster: Vec::new(),
            shafts: Vec::new(),
            config,
            rng,
            accumulator: 0.0,
            ticks: 0,
        }
    }

    /// Accumulate elapsed time and run a tick once the interval is reached.
    ///
    /// Returns whether a tick ran. At most one tick runs per call.
    pub fn update(&mut self, delta_seconds: f32, commands: &mut CommandQueue) -> Result<bool> {
        self.accumulator += delta_seconds.max(0.0);
        if self.accumulator < self.config.tick_interval {
            return Ok(false);
        }
        self.accumulator = 0.0;
        self.step(commands)?;
        Ok(true)
    }

    /// Run exactly one tick: drain commands, then agents, then elevators
    pub fn step(&mut self, commands: &mut CommandQueue) -> Result<()> {
        self.ticks += 1;

        for command in commands.drain() {
            if let Err(e) = self.apply(command) {
                log::warn!("Rejected command: {}", e);
            }
        }

        staff_system(
            &mut self.world,
            &self.roster,
            &mut self.grid,
            &mut self.ledger,
            &mut self.rng,
            self.config.retry_cooldown_ticks,
        )?;
        dispatch_system(&mut self.world, &self.shafts);
        Ok(())
    }

    /// Run `n` ticks, draining `commands` on the first
    pub fn step_n(&mut self, n: u64, commands: &mut CommandQueue) -> Result<()> {
        for _ in 0..n {
            self.step(commands)?;
        }
        Ok(())
    }

    /// Apply one command right away
    pub fn apply(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Dig(target) => {
                if self.add_dig(target).is_none() {
                    log::debug!("Dig at {} rejected: off the map or not below the surface", target);
                }
            }
            Command::DigArea { from, to } => {
                let Some(area) = self.grid.clip(Viewport::from_corners(from, to)) else {
                    log::debug!("Dig area {} to {} is off the map", from, to);
                    return Ok(());
                };
                let queued = area.cells().filter_map(|c| self.add_dig(c)).count();
                log::debug!("Dig area {} to {}: {} cells queued", from, to, queued);
            }
            Command::Recruit(role) => {
                self.hire(&role)?;
            }
            Command::BuildElevator { shaft, floors } => {
                self.build_elevator(shaft, floors);
            }
            Command::CallElevator { elevator, floor } => self.call_elevator(elevator, floor)?,
            Command::SendElevator { elevator, floor } => self.send_elevator(elevator, floor)?,
        }
        Ok(())
    }

    /// Hire by role name
    pub fn hire(&mut self, role: &str) -> Result<Entity> {
        let role = role.parse::<Role>()?;
        Ok(self.recruit(role))
    }

    /// Hire an employee at the configured hiring spot
    pub fn recruit(&mut self, role: Role) -> Entity {
        let entity = self.world.spawn((
            Employee::new(role),
            Location::at(self.config.hire_position),
            Behavior::new(),
        ));
        self.roster.push(entity);
        log::info!(
            "Hired {} #{} at {}",
            role,
            self.roster.len(),
            self.config.hire_position
        );
        entity
    }

    /// Queue a dig. Returns `None` if the target is off the map or at or
    /// above the surface.
    pub fn add_dig(&mut self, target: Coord) -> Option<TaskId> {
        if !self.grid.in_bounds(target) {
            return None;
        }
        self.ledger.enqueue(TaskKind::Dig, target)
    }

    /// Build an elevator with its cabin parked at the top of the shaft.
    ///
    /// The shaft's own floor is always serviced. Returns the elevator index.
    pub fn build_elevator(&mut self, shaft: Coord, floors: impl IntoIterator<Item = i32>) -> usize {
        let elevator = Elevator::new(shaft.y)
            .with_floors(std::iter::once(shaft.y))
            .with_floors(floors);
        let entity = self.world.spawn((Location::at(shaft), elevator));
        self.shafts.push(entity);
        log::info!("Built elevator {} at {}", self.shafts.len() - 1, shaft);
        self.shafts.len() - 1
    }

    fn elevator_entity(&self, index: usize) -> Result<Entity> {
        self.shafts
            .get(index)
            .copied()
            .ok_or(FacilityError::UnknownElevator(index))
    }

    fn with_serviced_elevator(
        &mut self,
        index: usize,
        floor: i32,
        f: impl FnOnce(&mut Elevator),
    ) -> Result<()> {
        let entity = self.elevator_entity(index)?;
        let mut elevator = self
            .world
            .get::<&mut Elevator>(entity)
            .map_err(|_| FacilityError::UnknownElevator(index))?;
        if !elevator.can_go_to(floor) {
            return Err(FacilityError::UnservicedFloor {
                elevator: index,
                floor,
            });
        }
        f(&mut *elevator);
        Ok(())
    }

    /// Call an elevator from a floor it services
    pub fn call_elevator(&mut self, index: usize, floor: i32) -> Result<()> {
        self.with_serviced_elevator(index, floor, |e| e.call(floor))
    }

    /// Ask an elevator to go to a floor it services
    pub fn send_elevator(&mut self, index: usize, floor: i32) -> Result<()> {
        self.with_serviced_elevator(index, floor, |e| e.request_destination(floor))
    }

    pub fn elevator(&self, index: usize) -> Option<Elevator> {
        let entity = self.shafts.get(index)?;
        self.world
            .get::<&Elevator>(*entity)
            .ok()
            .map(|e| (*e).clone())
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn ledger(&self) -> &TaskLedger {
        &self.ledger
    }

    pub fn config(&self) -> &FacilityConfig {
        &self.config
    }

    /// Ticks run so far
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    pub fn employee_count(&self) -> usize {
        self.roster.len()
    }

    pub fn elevator_count(&self) -> usize {
        self.shafts.len()
    }

    pub fn is_solid(&self, c: Coord) -> bool {
        self.grid.is_solid(c)
    }

    pub fn depth_of(&self, c: Coord) -> Option<i32> {
        self.grid.depth_of(c)
    }

    fn staff_view(&self, entity: Entity) -> Option<StaffView> {
        let mut query = self
            .world
            .query_one::<(&Employee, &Location, &Behavior)>(entity)
            .ok()?;
        let (employee, location, behavior) = query.get()?;
        Some(StaffView {
            entity,
            role: employee.role,
            position: location.coord(),
            state: behavior.state,
        })
    }

    /// All employees in hiring order
    pub fn employees(&self) -> Vec<StaffView> {
        self.roster
            .iter()
            .filter_map(|&e| self.staff_view(e))
            .collect()
    }

    pub fn employee(&self, entity: Entity) -> Option<StaffView> {
        self.staff_view(entity)
    }

    /// The task an employee currently holds, if any
    pub fn claimed_task(&self, entity: Entity) -> Option<TaskId> {
        self.world
            .get::<&Behavior>(entity)
            .ok()
            .and_then(|b| b.current_task)
    }

    pub fn employees_in(&self, viewport: Viewport) -> Vec<StaffView> {
        self.employees()
            .into_iter()
            .filter(|s| viewport.contains(s.position))
            .collect()
    }

    /// Pending tasks inside the viewport
    pub fn tasks_in(&self, viewport: Viewport) -> Vec<&Task> {
        self.ledger.pending_in(viewport)
    }

    /// Tasks being worked on inside the viewport
    pub fn ongoing_tasks_in(&self, viewport: Viewport) -> Vec<&Task> {
        self.ledger.in_progress_in(viewport)
    }

    /// Elevators whose cabin is inside the viewport
    pub fn elevators_in(&self, viewport: Viewport) -> Vec<ElevatorView> {
        self.shafts
            .iter()
            .enumerate()
            .filter_map(|(index, &entity)| {
                let mut query = self.world.query_one::<(&Location, &Elevator)>(entity).ok()?;
                let (location, elevator) = query.get()?;
                Some(ElevatorView {
                    index,
                    shaft: location.coord(),
                    cabin_floor: elevator.cabin_floor,
                    direction: elevator.direction,
                })
            })
            .filter(|v| viewport.contains(Coord::new(v.shaft.x, v.cabin_floor)))
            .collect()
    }
}

impl Default for Facility {
    fn default() -> Self {
        Self::new(FacilityConfig::default())
    }
}

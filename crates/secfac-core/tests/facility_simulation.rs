//! End-to-end facility runs and property checks over the core invariants.

use proptest::prelude::*;
use secfac_core::grid::{DigOutcome, Grid};
use secfac_core::ledger::TaskLedger;
use secfac_core::prelude::*;
use secfac_core::systems::advance_cabin;

fn small_facility(seed: u64) -> Facility {
    let config = FacilityConfig {
        width: 20,
        height: 20,
        ..FacilityConfig::default()
    }
    .with_seed(seed);
    Facility::new(config)
}

#[test]
fn worker_digs_a_cell_below_ground() {
    let mut facility = small_facility(1);
    let mut commands = CommandQueue::new();
    let target = Coord::new(3, 4);
    commands.push(Command::recruit("worker"));
    commands.push(Command::Dig(target));

    let mut states = vec![BehaviorState::Idle];
    for _ in 0..40 {
        facility.step(&mut commands).unwrap();
        let state = facility.employees()[0].state;
        if states.last() != Some(&state) {
            states.push(state);
        }
        if facility.ledger().is_empty() {
            break;
        }
    }

    assert_eq!(
        states,
        vec![
            BehaviorState::Idle,
            BehaviorState::MovingToTask,
            BehaviorState::PerformingTask,
            BehaviorState::Idle,
        ]
    );
    assert_eq!(facility.ledger().in_progress_count(), 0);
    assert!(!facility.is_solid(target));
}

#[test]
fn crew_clears_a_dig_area() {
    let mut facility = small_facility(9);
    let mut commands = CommandQueue::new();
    for _ in 0..3 {
        commands.push(Command::recruit("worker"));
    }
    commands.push(Command::DigArea {
        from: Coord::new(5, 4),
        to: Coord::new(7, 5),
    });

    for _ in 0..300 {
        facility.step(&mut commands).unwrap();
        if facility.ledger().is_empty() {
            break;
        }
    }

    assert!(facility.ledger().is_empty());
    for cell in Viewport::new(5, 4, 7, 5).cells() {
        assert!(!facility.is_solid(cell), "{} still solid", cell);
    }
    // Nobody walked into rock
    for staff in facility.employees() {
        assert!(!facility.is_solid(staff.position));
    }
}

#[test]
fn non_workers_leave_digs_alone() {
    let mut facility = small_facility(3);
    let mut commands = CommandQueue::new();
    commands.push(Command::recruit("Security"));
    commands.push(Command::recruit("research"));
    commands.push(Command::Dig(Coord::new(2, 4)));

    facility.step_n(20, &mut commands).unwrap();

    assert_eq!(facility.ledger().pending_count(), 1);
    assert!(facility
        .employees()
        .iter()
        .all(|s| s.state == BehaviorState::Idle));
}

#[test]
fn elevator_answers_a_scripted_call() {
    let mut facility = small_facility(4);
    let script = r#"[
        { "build_elevator": { "shaft": { "x": 10, "y": 3 }, "floors": [3, 8] } },
        { "call_elevator": { "elevator": 0, "floor": 8 } }
    ]"#;
    let mut commands = CommandQueue::new();
    commands.extend(serde_json::from_str::<Vec<Command>>(script).unwrap());

    facility.step_n(5, &mut commands).unwrap();

    let elevator = facility.elevator(0).unwrap();
    assert_eq!(elevator.cabin_floor, 8);
    assert!(!elevator.is_called_or_has_destination());
}

#[test]
fn update_waits_for_the_interval() {
    let mut facility = small_facility(5);
    let mut commands = CommandQueue::new();
    commands.push(Command::recruit("worker"));

    assert!(!facility.update(0.25, &mut commands).unwrap());
    assert_eq!(facility.employee_count(), 0);
    assert!(facility.update(0.25, &mut commands).unwrap());
    assert_eq!(facility.employee_count(), 1);
    assert_eq!(facility.tick_count(), 1);
}

proptest! {
    #[test]
    fn digs_at_or_above_surface_are_ignored(x in -5i32..25, y in -5i32..=3) {
        let mut ledger = TaskLedger::new(3);
        prop_assert!(ledger.enqueue(TaskKind::Dig, Coord::new(x, y)).is_none());
        prop_assert!(ledger.is_empty());
    }

    #[test]
    fn dig_strokes_only_ever_open_rock(
        strokes in prop::collection::vec((-3i32..12, -3i32..12), 0..200)
    ) {
        let mut grid = Grid::new(8, 8, 3, 3);
        for (x, y) in strokes {
            let c = Coord::new(x, y);
            let before = grid.cell(c).copied();
            let outcome = grid.dig(c);
            match before {
                None => prop_assert_eq!(outcome, DigOutcome::OutOfBounds),
                Some(cell) => {
                    let after = grid.cell(c).copied().unwrap();
                    prop_assert!(after.resistance <= cell.resistance);
                    prop_assert_eq!(after.depth, cell.depth);
                    if !cell.solid {
                        prop_assert!(!after.solid);
                        prop_assert_eq!(outcome, DigOutcome::AlreadyOpen);
                    }
                    prop_assert_eq!(after.solid, after.resistance > 0);
                }
            }
        }
    }

    #[test]
    fn a_task_is_claimed_at_most_once(x in 0i32..20, y in 4i32..20) {
        let mut ledger = TaskLedger::new(3);
        let id = ledger.enqueue(TaskKind::Dig, Coord::new(x, y)).unwrap();
        prop_assert!(ledger.claim(id).is_ok());
        prop_assert!(matches!(ledger.claim(id), Err(FacilityError::TaskNotPending(_))));
        prop_assert_eq!(ledger.in_progress_count(), 1);
    }

    #[test]
    fn buried_tasks_never_pull_workers_out_of_idle(
        x in 0i32..20,
        y in 5i32..20,
        seed in any::<u64>(),
    ) {
        let mut facility = small_facility(seed);
        let mut commands = CommandQueue::new();
        commands.push(Command::recruit("worker"));
        commands.push(Command::Dig(Coord::new(x, y)));

        for _ in 0..15 {
            facility.step(&mut commands).unwrap();
            prop_assert_eq!(facility.employees()[0].state, BehaviorState::Idle);
        }
        prop_assert_eq!(facility.ledger().pending_count(), 1);
        prop_assert_eq!(facility.employees()[0].position.y, 3);
    }

    #[test]
    fn elevator_eventually_serves_every_request(
        floors in prop::collection::btree_set(0i32..10, 1..6),
        calls in prop::collection::vec(any::<prop::sample::Index>(), 0..6),
        destinations in prop::collection::vec(any::<prop::sample::Index>(), 0..6),
        start in any::<prop::sample::Index>(),
    ) {
        let floors: Vec<i32> = floors.into_iter().collect();
        let mut elevator = Elevator::new(*start.get(&floors)).with_floors(floors.clone());
        for c in &calls {
            elevator.call(*c.get(&floors));
        }
        for d in &destinations {
            elevator.request_destination(*d.get(&floors));
        }

        for _ in 0..40 {
            advance_cabin(&mut elevator);
            prop_assert!(elevator.cabin_floor >= floors[0]);
            prop_assert!(elevator.cabin_floor <= floors[floors.len() - 1]);
        }
        prop_assert!(!elevator.is_called_or_has_destination());
        prop_assert_eq!(elevator.direction, Direction::Idle);
    }
}

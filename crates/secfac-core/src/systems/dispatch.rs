//! Dispatch system - moves elevator cabins one floor per tick

use hecs::{Entity, World};

use crate::components::Elevator;

/// Advance every elevator in `shafts`, in order
pub fn dispatch_system(world: &mut World, shafts: &[Entity]) {
    for &entity in shafts {
        if let Ok(mut elevator) = world.get::<&mut Elevator>(entity) {
            advance_cabin(&mut elevator);
        }
    }
}

/// One tick of cabin travel.
///
/// Requests at the floor the cabin is already on are served before deciding,
/// so a call at the current floor never sends the cabin away.
pub fn advance_cabin(elevator: &mut Elevator) {
    let cabin = elevator.cabin_floor;
    if elevator.has_request_at(cabin) {
        log::debug!("Elevator served floor {} without moving", cabin);
        elevator.arrives_at(cabin);
    }

    let direction = elevator.decide_next_direction();
    elevator.direction = direction;
    if !direction.is_moving() {
        return;
    }

    let next = elevator.cabin_floor + direction.dy();
    elevator.cabin_floor = next;
    if elevator.can_go_to(next) {
        if elevator.has_request_at(next) {
            log::debug!("Elevator arrived at floor {}", next);
        }
        elevator.arrives_at(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Direction, Location};

    fn elevator() -> Elevator {
        Elevator::new(4).with_floors([4, 8, 12])
    }

    #[test]
    fn test_cabin_travels_to_call() {
        let mut elevator = elevator();
        elevator.call(8);

        for _ in 0..4 {
            advance_cabin(&mut elevator);
        }
        assert_eq!(elevator.cabin_floor, 8);
        assert!(!elevator.is_called_or_has_destination());
        assert_eq!(elevator.direction, Direction::Down);

        advance_cabin(&mut elevator);
        assert_eq!(elevator.direction, Direction::Idle);
        assert_eq!(elevator.cabin_floor, 8);
    }

    #[test]
    fn test_call_at_current_floor_served_in_place() {
        let mut elevator = elevator();
        elevator.call(4);
        advance_cabin(&mut elevator);
        assert_eq!(elevator.cabin_floor, 4);
        assert_eq!(elevator.direction, Direction::Idle);
        assert!(!elevator.is_called_or_has_destination());
    }

    #[test]
    fn test_sweeps_before_reversing() {
        let mut elevator = elevator();
        elevator.cabin_floor = 8;
        elevator.direction = Direction::Down;
        elevator.call(4);
        elevator.request_destination(12);

        // Keeps going down to 12 first
        for _ in 0..4 {
            advance_cabin(&mut elevator);
        }
        assert_eq!(elevator.cabin_floor, 12);
        assert!(elevator.has_request_at(4));

        // Then turns around for 4
        for _ in 0..8 {
            advance_cabin(&mut elevator);
        }
        assert_eq!(elevator.cabin_floor, 4);
        assert!(!elevator.is_called_or_has_destination());
    }

    #[test]
    fn test_system_walks_shafts() {
        let mut world = World::new();
        let mut first = elevator();
        first.call(12);
        let a = world.spawn((Location::new(1, 4), first));
        let b = world.spawn((Location::new(5, 4), elevator()));

        dispatch_system(&mut world, &[a, b]);

        assert_eq!(world.get::<&Elevator>(a).unwrap().cabin_floor, 5);
        assert_eq!(world.get::<&Elevator>(b).unwrap().cabin_floor, 4);
    }
}

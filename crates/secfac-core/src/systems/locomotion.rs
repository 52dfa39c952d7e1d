//! Locomotion - commits intended steps that land on walkable cells

use crate::circulation::Circulation;
use crate::components::Location;
use crate::grid::Grid;

/// Apply the intended step if the destination is walkable.
///
/// Returns true if the entity moved. A blocked step leaves the entity in
/// place with its intent untouched.
pub fn commit_step(location: &mut Location, grid: &Grid) -> bool {
    if location.is_still() {
        return false;
    }
    let next = location.intended();
    if Circulation::new(grid).is_walkable(next) {
        location.x = next.x;
        location.y = next.y;
        true
    } else {
        false
    }
}

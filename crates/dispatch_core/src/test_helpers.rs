//! Test helpers for common fleet and request fixtures.

use crate::fleet::{Driver, DriverId, FleetRegistry};
use crate::request::{RequestId, RideRequest};
use crate::spatial::Coordinate;

/// Available driver at `(x, y)`.
pub fn driver_at(id: u32, x: i32, y: i32) -> Driver {
    Driver::new(DriverId(id), Coordinate::new(x, y))
}

/// Registry over the given `(x, y)` positions, ids numbered from 1 in order.
///
/// # Panics
///
/// Never in practice: generated ids are unique.
pub fn fleet_at(positions: &[(i32, i32)]) -> FleetRegistry {
    let drivers = positions
        .iter()
        .enumerate()
        .map(|(index, &(x, y))| driver_at(index as u32 + 1, x, y))
        .collect();
    FleetRegistry::new(drivers).expect("sequential driver ids are unique")
}

pub fn request(id: u64, origin: (i32, i32), destination: (i32, i32)) -> RideRequest {
    RideRequest::new(RequestId(id), origin.into(), destination.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fleet_at_numbers_drivers_in_order() {
        let fleet = fleet_at(&[(1, 2), (3, 4)]);
        let drivers = fleet.snapshot();
        assert_eq!(drivers[0].id, DriverId(1));
        assert_eq!(drivers[1].location, Coordinate::new(3, 4));
    }
}

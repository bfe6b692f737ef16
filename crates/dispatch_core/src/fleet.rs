//! Fleet registry: the only owner of driver location and availability.
//!
//! One lock guards the whole fleet. The nearest-available scan and the
//! availability flip happen inside the same critical section, so two
//! concurrent reservations can never pick the same driver. The guard is never
//! held across an `.await`.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::DispatchError;
use crate::spatial::{squared_distance, Coordinate};

/// Identifier of a driver, stable for the lifetime of the fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DriverId(pub u32);

impl std::fmt::Display for DriverId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Driver {
    pub id: DriverId,
    pub location: Coordinate,
    pub available: bool,
}

impl Driver {
    pub fn new(id: DriverId, location: Coordinate) -> Self {
        Self {
            id,
            location,
            available: true,
        }
    }
}

/// Result of a successful reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reservation {
    pub driver_id: DriverId,
    /// Where the driver was when reserved.
    pub driver_location: Coordinate,
    /// Squared distance from the driver to the pickup point.
    pub squared_distance: i64,
}

impl Reservation {
    /// Straight-line pickup distance, for display only.
    pub fn distance(&self) -> f64 {
        (self.squared_distance as f64).sqrt()
    }
}

/// Index of the closest available driver to `origin`.
///
/// Ties keep the first driver in slice order.
pub fn nearest_available(drivers: &[Driver], origin: Coordinate) -> Option<(usize, i64)> {
    drivers
        .iter()
        .enumerate()
        .filter(|(_, driver)| driver.available)
        .map(|(index, driver)| (index, squared_distance(driver.location, origin)))
        .fold(None, |best, candidate| match best {
            Some((_, best_distance)) if best_distance <= candidate.1 => best,
            _ => Some(candidate),
        })
}

struct FleetState {
    drivers: Vec<Driver>,
    index: HashMap<DriverId, usize>,
}

/// Shared handle to the fleet. Cloning is cheap and every clone sees the same
/// drivers.
#[derive(Clone)]
pub struct FleetRegistry {
    state: Arc<Mutex<FleetState>>,
}

impl std::fmt::Debug for FleetRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FleetRegistry")
            .field("drivers", &self.state.lock().drivers)
            .finish()
    }
}

impl FleetRegistry {
    /// Build a registry from an ordered list of drivers. Driver ids must be
    /// unique; the order fixes tie-breaking for the lifetime of the fleet.
    pub fn new(drivers: Vec<Driver>) -> Result<Self, DispatchError> {
        let mut index = HashMap::with_capacity(drivers.len());
        for (position, driver) in drivers.iter().enumerate() {
            if index.insert(driver.id, position).is_some() {
                return Err(DispatchError::InvalidConfig(format!(
                    "duplicate driver id {}",
                    driver.id
                )));
            }
        }
        Ok(Self {
            state: Arc::new(Mutex::new(FleetState { drivers, index })),
        })
    }

    /// Find the closest available driver to `origin` and mark it unavailable.
    ///
    /// Returns `None` when no driver is available. That is a normal outcome
    /// under load, not a failure.
    pub fn reserve_nearest(&self, origin: Coordinate) -> Option<Reservation> {
        let mut state = self.state.lock();
        let (position, distance) = nearest_available(&state.drivers, origin)?;
        let driver = &mut state.drivers[position];
        driver.available = false;
        debug!(driver_id = %driver.id, %origin, squared_distance = distance, "driver reserved");
        Some(Reservation {
            driver_id: driver.id,
            driver_location: driver.location,
            squared_distance: distance,
        })
    }

    /// Move a driver to `location` and return it to the available pool.
    pub fn release_at(&self, driver_id: DriverId, location: Coordinate) -> Result<(), DispatchError> {
        let mut state = self.state.lock();
        let position = *state
            .index
            .get(&driver_id)
            .ok_or(DispatchError::UnknownDriver { driver_id })?;
        let driver = &mut state.drivers[position];
        driver.location = location;
        driver.available = true;
        debug!(%driver_id, %location, "driver released");
        Ok(())
    }

    /// Consistent copy of every driver, in fleet order.
    pub fn snapshot(&self) -> Vec<Driver> {
        self.state.lock().drivers.clone()
    }

    pub fn driver(&self, driver_id: DriverId) -> Option<Driver> {
        let state = self.state.lock();
        state.index.get(&driver_id).map(|&position| state.drivers[position])
    }

    pub fn available_count(&self) -> usize {
        self.state
            .lock()
            .drivers
            .iter()
            .filter(|driver| driver.available)
            .count()
    }

    pub fn len(&self) -> usize {
        self.state.lock().drivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driver(id: u32, x: i32, y: i32) -> Driver {
        Driver::new(DriverId(id), Coordinate::new(x, y))
    }

    #[test]
    fn reserve_picks_nearest_and_marks_it_unavailable() {
        let fleet = FleetRegistry::new(vec![
            driver(1, 10, 10),
            driver(2, 50, 50),
            driver(3, 80, 80),
        ])
        .expect("fleet");

        let reservation = fleet
            .reserve_nearest(Coordinate::new(12, 12))
            .expect("a driver should be reserved");

        assert_eq!(reservation.driver_id, DriverId(1));
        assert_eq!(reservation.squared_distance, 8);
        assert!(!fleet.driver(DriverId(1)).expect("driver 1").available);
        assert!(fleet.driver(DriverId(2)).expect("driver 2").available);
        assert!(fleet.driver(DriverId(3)).expect("driver 3").available);
    }

    #[test]
    fn ties_go_to_the_first_driver_in_fleet_order() {
        let fleet = FleetRegistry::new(vec![driver(7, 0, 5), driver(3, 5, 0), driver(9, -5, 0)])
            .expect("fleet");

        let first = fleet.reserve_nearest(Coordinate::new(0, 0)).expect("first");
        let second = fleet.reserve_nearest(Coordinate::new(0, 0)).expect("second");

        assert_eq!(first.driver_id, DriverId(7));
        assert_eq!(second.driver_id, DriverId(3));
    }

    #[test]
    fn reserve_skips_unavailable_drivers() {
        let fleet = FleetRegistry::new(vec![driver(1, 0, 0), driver(2, 90, 90)]).expect("fleet");
        fleet.reserve_nearest(Coordinate::new(0, 0)).expect("first");

        let second = fleet.reserve_nearest(Coordinate::new(1, 1)).expect("second");
        assert_eq!(second.driver_id, DriverId(2));
    }

    #[test]
    fn exhausted_fleet_returns_none() {
        let fleet = FleetRegistry::new(vec![driver(1, 0, 0)]).expect("fleet");
        assert!(fleet.reserve_nearest(Coordinate::new(3, 3)).is_some());
        assert!(fleet.reserve_nearest(Coordinate::new(3, 3)).is_none());
        assert!(fleet.reserve_nearest(Coordinate::new(-40, 99)).is_none());
        assert_eq!(fleet.available_count(), 0);
    }

    #[test]
    fn empty_fleet_returns_none() {
        let fleet = FleetRegistry::new(Vec::new()).expect("fleet");
        assert!(fleet.is_empty());
        assert!(fleet.reserve_nearest(Coordinate::default()).is_none());
    }

    #[test]
    fn release_moves_driver_and_makes_it_eligible_again() {
        let fleet = FleetRegistry::new(vec![driver(1, 0, 0)]).expect("fleet");
        fleet.reserve_nearest(Coordinate::new(0, 0)).expect("reserve");

        fleet
            .release_at(DriverId(1), Coordinate::new(42, -17))
            .expect("release");

        let released = fleet.driver(DriverId(1)).expect("driver");
        assert_eq!(released.location, Coordinate::new(42, -17));
        assert!(released.available);

        let again = fleet.reserve_nearest(Coordinate::new(40, -17)).expect("reserve again");
        assert_eq!(again.driver_id, DriverId(1));
        assert_eq!(again.driver_location, Coordinate::new(42, -17));
        assert_eq!(again.squared_distance, 4);
    }

    #[test]
    fn release_of_unknown_driver_is_rejected() {
        let fleet = FleetRegistry::new(vec![driver(1, 0, 0)]).expect("fleet");
        let err = fleet
            .release_at(DriverId(99), Coordinate::new(1, 1))
            .expect_err("unknown driver");
        assert!(matches!(err, DispatchError::UnknownDriver { driver_id } if driver_id == DriverId(99)));
    }

    #[test]
    fn duplicate_driver_ids_are_rejected() {
        let err = FleetRegistry::new(vec![driver(1, 0, 0), driver(1, 5, 5)]).expect_err("duplicate");
        assert!(matches!(err, DispatchError::InvalidConfig(_)));
    }

    #[test]
    fn nearest_available_ignores_reserved_drivers() {
        let mut drivers = vec![driver(1, 1, 1), driver(2, 3, 3)];
        drivers[0].available = false;
        assert_eq!(nearest_available(&drivers, Coordinate::new(0, 0)), Some((1, 18)));
        drivers[1].available = false;
        assert_eq!(nearest_available(&drivers, Coordinate::new(0, 0)), None);
    }
}

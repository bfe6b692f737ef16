//! Trip lifecycle: hold the driver for the trip, then release it at the
//! drop-off point.

use std::time::Duration;

use rand::Rng;

use crate::error::DispatchError;
use crate::fleet::{DriverId, FleetRegistry};
use crate::request::RideRequest;
use crate::telemetry::{DispatchEvent, DispatchTelemetry};

/// Uniform trip length over whole time units in `min_units..max_units`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TripDurationModel {
    min_units: u64,
    max_units: u64,
    unit: Duration,
}

impl TripDurationModel {
    pub fn new(min_units: u64, max_units: u64, unit: Duration) -> Self {
        debug_assert!(min_units < max_units, "trip range must not be empty");
        Self {
            min_units,
            max_units,
            unit,
        }
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> Duration {
        let units = if self.max_units > self.min_units {
            rng.gen_range(self.min_units..self.max_units)
        } else {
            self.min_units
        };
        self.units(units)
    }

    pub fn min(&self) -> Duration {
        self.units(self.min_units)
    }

    /// Exclusive upper bound.
    pub fn max(&self) -> Duration {
        self.units(self.max_units)
    }

    /// `count` time units, saturating at `Duration::MAX`.
    fn units(&self, count: u64) -> Duration {
        u32::try_from(count)
            .ok()
            .and_then(|count| self.unit.checked_mul(count))
            .unwrap_or(Duration::MAX)
    }
}

/// Carry an assigned request to its destination.
///
/// Sleeps for `duration`, then returns the driver to the pool at the drop-off
/// point. Returns the request so the caller can collect its final state.
pub async fn run_trip(
    fleet: FleetRegistry,
    telemetry: DispatchTelemetry,
    request: RideRequest,
    driver_id: DriverId,
    duration: Duration,
) -> Result<RideRequest, DispatchError> {
    debug_assert_eq!(request.assigned_driver, Some(driver_id));
    telemetry.record(DispatchEvent::TripStarted {
        request_id: request.id,
        driver_id,
        duration,
    });

    tokio::time::sleep(duration).await;

    fleet.release_at(driver_id, request.destination)?;
    telemetry.record(DispatchEvent::TripCompleted {
        request_id: request.id,
        driver_id,
        dropoff: request.destination,
    });
    Ok(request)
}

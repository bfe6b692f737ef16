use serde::{Deserialize, Serialize};

use crate::fleet::DriverId;
use crate::spatial::Coordinate;

/// Identifier of a ride request, unique within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestId(pub u64);

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A rider asking to be carried from `origin` to `destination`.
///
/// `assigned_driver` is set once by the dispatcher. It holds the driver's id
/// only; the fleet keeps ownership of the driver itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RideRequest {
    pub id: RequestId,
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub assigned_driver: Option<DriverId>,
}

impl RideRequest {
    pub fn new(id: RequestId, origin: Coordinate, destination: Coordinate) -> Self {
        Self {
            id,
            origin,
            destination,
            assigned_driver: None,
        }
    }

    pub fn is_assigned(&self) -> bool {
        self.assigned_driver.is_some()
    }
}

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod fleet;
pub mod queue;
pub mod request;
pub mod scenario;
pub mod spatial;
pub mod telemetry;
pub mod trip;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use config::DispatchConfig;
pub use dispatcher::{DispatchReport, Dispatcher};
pub use error::DispatchError;
pub use fleet::{Driver, DriverId, FleetRegistry, Reservation};
pub use queue::{request_queue, RequestReceiver, RequestSender};
pub use request::{RequestId, RideRequest};
pub use spatial::Coordinate;

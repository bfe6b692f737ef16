//! Error types for the dispatch engine.
//!
//! An empty fleet is not an error: `FleetRegistry::reserve_nearest` reports it
//! as `None` and the dispatcher drops the request.

use thiserror::Error;

use crate::fleet::DriverId;
use crate::request::RequestId;

#[derive(Debug, Error)]
pub enum DispatchError {
    /// A producer tried to enqueue after the dispatcher stopped consuming.
    #[error("request queue closed while enqueueing request {request_id}")]
    QueueClosed { request_id: RequestId },

    #[error("driver {driver_id} is not part of the fleet")]
    UnknownDriver { driver_id: DriverId },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A spawned task panicked or was aborted.
    #[error("{role} task failed: {source}")]
    Task {
        role: &'static str,
        #[source]
        source: tokio::task::JoinError,
    },

    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

//! Run configuration: fleet size, demand, queue depth and trip timing.
//!
//! Defaults reproduce the reference run: 5 drivers, 100 requests arriving every
//! 200 ms, trips lasting 3 to 7 whole seconds.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::DispatchError;
use crate::queue::DEFAULT_QUEUE_CAPACITY;
use crate::trip::TripDurationModel;

pub const DEFAULT_FLEET_SIZE: usize = 5;
pub const DEFAULT_REQUEST_COUNT: usize = 100;
pub const DEFAULT_INTER_ARRIVAL_MS: u64 = 200;
/// Trip length bounds in time units; the upper bound is exclusive.
pub const DEFAULT_TRIP_MIN_UNITS: u64 = 3;
pub const DEFAULT_TRIP_MAX_UNITS: u64 = 8;
pub const DEFAULT_TIME_UNIT_MS: u64 = 1000;
/// Coordinates are drawn from `0..grid_extent` on both axes.
pub const DEFAULT_GRID_EXTENT: i32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    pub fleet_size: usize,
    pub request_count: usize,
    pub queue_capacity: usize,
    /// Delay between two consecutive request arrivals.
    pub inter_arrival_ms: u64,
    pub trip_min_units: u64,
    pub trip_max_units: u64,
    pub time_unit_ms: u64,
    pub grid_extent: i32,
    /// Seed for fleet placement, request generation and trip lengths. `None`
    /// draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            fleet_size: DEFAULT_FLEET_SIZE,
            request_count: DEFAULT_REQUEST_COUNT,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            inter_arrival_ms: DEFAULT_INTER_ARRIVAL_MS,
            trip_min_units: DEFAULT_TRIP_MIN_UNITS,
            trip_max_units: DEFAULT_TRIP_MAX_UNITS,
            time_unit_ms: DEFAULT_TIME_UNIT_MS,
            grid_extent: DEFAULT_GRID_EXTENT,
            seed: None,
        }
    }
}

impl DispatchConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, DispatchError> {
        let config = Self::parse_toml_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, DispatchError> {
        let config = Self::parse_toml_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse without validating, for callers that layer overrides on top
    /// and validate the result themselves.
    pub fn parse_toml_str(source: &str) -> Result<Self, DispatchError> {
        Ok(toml::from_str(source)?)
    }

    pub fn parse_toml_file(path: impl AsRef<Path>) -> Result<Self, DispatchError> {
        let source = std::fs::read_to_string(path)?;
        Self::parse_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), DispatchError> {
        if self.fleet_size == 0 {
            return Err(DispatchError::InvalidConfig(
                "fleet_size must be at least 1".to_string(),
            ));
        }
        if u32::try_from(self.fleet_size).is_err() {
            return Err(DispatchError::InvalidConfig(format!(
                "fleet_size {} exceeds the driver id range",
                self.fleet_size
            )));
        }
        if self.queue_capacity == 0 {
            return Err(DispatchError::InvalidConfig(
                "queue_capacity must be at least 1".to_string(),
            ));
        }
        if self.trip_min_units >= self.trip_max_units {
            return Err(DispatchError::InvalidConfig(format!(
                "trip range {}..{} is empty",
                self.trip_min_units, self.trip_max_units
            )));
        }
        if self.time_unit_ms == 0 {
            return Err(DispatchError::InvalidConfig(
                "time_unit_ms must be positive".to_string(),
            ));
        }
        if u32::try_from(self.trip_max_units).is_err()
            || self.time_unit_ms.checked_mul(self.trip_max_units).is_none()
        {
            return Err(DispatchError::InvalidConfig(format!(
                "trip length of {} units of {} ms is too long",
                self.trip_max_units, self.time_unit_ms
            )));
        }
        if self.grid_extent <= 0 {
            return Err(DispatchError::InvalidConfig(
                "grid_extent must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_fleet_size(mut self, fleet_size: usize) -> Self {
        self.fleet_size = fleet_size;
        self
    }

    pub fn with_request_count(mut self, request_count: usize) -> Self {
        self.request_count = request_count;
        self
    }

    pub fn with_queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.queue_capacity = queue_capacity;
        self
    }

    pub fn with_inter_arrival_ms(mut self, inter_arrival_ms: u64) -> Self {
        self.inter_arrival_ms = inter_arrival_ms;
        self
    }

    /// Trip length range in time units, `min` inclusive and `max` exclusive.
    pub fn with_trip_units(mut self, min: u64, max: u64) -> Self {
        self.trip_min_units = min;
        self.trip_max_units = max;
        self
    }

    pub fn with_time_unit_ms(mut self, time_unit_ms: u64) -> Self {
        self.time_unit_ms = time_unit_ms;
        self
    }

    pub fn with_grid_extent(mut self, grid_extent: i32) -> Self {
        self.grid_extent = grid_extent;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn inter_arrival(&self) -> Duration {
        Duration::from_millis(self.inter_arrival_ms)
    }

    pub fn trip_duration_model(&self) -> TripDurationModel {
        TripDurationModel::new(
            self.trip_min_units,
            self.trip_max_units,
            Duration::from_millis(self.time_unit_ms),
        )
    }
}

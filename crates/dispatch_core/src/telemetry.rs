//! Dispatch event stream: every lifecycle step is logged through `tracing`
//! and recorded so callers can count outcomes after a run.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::fleet::DriverId;
use crate::request::RequestId;
use crate::spatial::Coordinate;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DispatchEvent {
    RequestReceived {
        request_id: RequestId,
        origin: Coordinate,
        destination: Coordinate,
    },
    SearchStarted {
        request_id: RequestId,
    },
    Assigned {
        request_id: RequestId,
        driver_id: DriverId,
        pickup_distance: f64,
    },
    NoDriverAvailable {
        request_id: RequestId,
    },
    TripStarted {
        request_id: RequestId,
        driver_id: DriverId,
        duration: Duration,
    },
    TripCompleted {
        request_id: RequestId,
        driver_id: DriverId,
        dropoff: Coordinate,
    },
}

impl DispatchEvent {
    fn log(&self) {
        match *self {
            DispatchEvent::RequestReceived {
                request_id,
                origin,
                destination,
            } => info!(%request_id, %origin, %destination, "ride requested"),
            DispatchEvent::SearchStarted { request_id } => {
                info!(%request_id, "searching for driver")
            }
            DispatchEvent::Assigned {
                request_id,
                driver_id,
                pickup_distance,
            } => info!(%request_id, %driver_id, pickup_distance, "request assigned"),
            DispatchEvent::NoDriverAvailable { request_id } => {
                warn!(%request_id, "no driver available, request dropped")
            }
            DispatchEvent::TripStarted {
                request_id,
                driver_id,
                duration,
            } => info!(%request_id, %driver_id, ?duration, "trip started"),
            DispatchEvent::TripCompleted {
                request_id,
                driver_id,
                dropoff,
            } => info!(%request_id, %driver_id, %dropoff, "trip completed"),
        }
    }
}

/// One recorded event and when it happened relative to the recorder's start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordedEvent {
    pub at: Duration,
    pub event: DispatchEvent,
}

/// Aggregated event counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchCounts {
    pub requests_received: usize,
    pub searches_started: usize,
    pub assigned: usize,
    pub no_driver_available: usize,
    pub trips_started: usize,
    pub trips_completed: usize,
}

impl DispatchCounts {
    pub fn add(&mut self, event: &DispatchEvent) {
        match event {
            DispatchEvent::RequestReceived { .. } => self.requests_received += 1,
            DispatchEvent::SearchStarted { .. } => self.searches_started += 1,
            DispatchEvent::Assigned { .. } => self.assigned += 1,
            DispatchEvent::NoDriverAvailable { .. } => self.no_driver_available += 1,
            DispatchEvent::TripStarted { .. } => self.trips_started += 1,
            DispatchEvent::TripCompleted { .. } => self.trips_completed += 1,
        }
    }

    /// Trips that were started but have not finished yet.
    pub fn trips_in_flight(&self) -> usize {
        self.trips_started.saturating_sub(self.trips_completed)
    }
}

#[derive(Debug)]
struct TelemetryState {
    started_at: Instant,
    events: Vec<RecordedEvent>,
    keep_events: bool,
    counts: DispatchCounts,
}

/// Shared event recorder. Clones append to the same log.
///
/// The log grows by a handful of events per request for the whole run. Use
/// [`DispatchTelemetry::counts_only`] when only the totals are needed.
#[derive(Debug, Clone)]
pub struct DispatchTelemetry {
    state: Arc<Mutex<TelemetryState>>,
}

impl Default for DispatchTelemetry {
    fn default() -> Self {
        Self::new()
    }
}

impl DispatchTelemetry {
    pub fn new() -> Self {
        Self::with_event_log(true)
    }

    /// Recorder that logs and counts events without retaining them.
    pub fn counts_only() -> Self {
        Self::with_event_log(false)
    }

    fn with_event_log(keep_events: bool) -> Self {
        Self {
            state: Arc::new(Mutex::new(TelemetryState {
                started_at: Instant::now(),
                events: Vec::new(),
                keep_events,
                counts: DispatchCounts::default(),
            })),
        }
    }

    pub fn record(&self, event: DispatchEvent) {
        event.log();
        let mut state = self.state.lock();
        state.counts.add(&event);
        if state.keep_events {
            let at = state.started_at.elapsed();
            state.events.push(RecordedEvent { at, event });
        }
    }

    pub fn counts(&self) -> DispatchCounts {
        self.state.lock().counts
    }

    pub fn events(&self) -> Vec<RecordedEvent> {
        self.state.lock().events.clone()
    }
}

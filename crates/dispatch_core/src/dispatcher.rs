//! Dispatcher: the single consumer of the request queue.
//!
//! For each request it reserves the nearest available driver and hands the
//! trip to its own task, then moves straight on to the next request. Requests
//! that find no driver are dropped. Once the queue is closed and drained the
//! dispatcher waits for every trip still in flight and returns a report.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::task::{JoinError, JoinHandle, JoinSet};
use tracing::{error, info};

use crate::config::DispatchConfig;
use crate::error::DispatchError;
use crate::fleet::{Driver, FleetRegistry};
use crate::queue::RequestReceiver;
use crate::request::RideRequest;
use crate::telemetry::{DispatchCounts, DispatchEvent, DispatchTelemetry};
use crate::trip::{run_trip, TripDurationModel};

type TripResult = Result<RideRequest, DispatchError>;

/// Final state of a dispatch run.
#[derive(Debug)]
pub struct DispatchReport {
    /// Requests whose trip finished, in completion order.
    pub completed: Vec<RideRequest>,
    /// Requests that found no available driver, in dispatch order.
    pub dropped: Vec<RideRequest>,
    /// Trips that ended without releasing their driver.
    pub failures: Vec<DispatchError>,
    pub counts: DispatchCounts,
    /// Fleet state after the last trip finished.
    pub fleet: Vec<Driver>,
}

impl DispatchReport {
    pub fn total_requests(&self) -> usize {
        self.completed.len() + self.dropped.len() + self.failures.len()
    }

    pub fn all_drivers_available(&self) -> bool {
        self.fleet.iter().all(|driver| driver.available)
    }
}

pub struct Dispatcher {
    fleet: FleetRegistry,
    telemetry: DispatchTelemetry,
    trip_model: TripDurationModel,
    rng: StdRng,
}

impl Dispatcher {
    pub fn new(
        fleet: FleetRegistry,
        telemetry: DispatchTelemetry,
        trip_model: TripDurationModel,
        rng: StdRng,
    ) -> Self {
        Self {
            fleet,
            telemetry,
            trip_model,
            rng,
        }
    }

    /// Dispatcher with trip timing taken from `config`. Trip lengths use a
    /// stream derived from the config seed, separate from scenario seeding.
    pub fn from_config(
        fleet: FleetRegistry,
        telemetry: DispatchTelemetry,
        config: &DispatchConfig,
    ) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(TRIP_SEED_OFFSET)),
            None => StdRng::from_entropy(),
        };
        Self::new(fleet, telemetry, config.trip_duration_model(), rng)
    }

    /// Run on its own task.
    pub fn spawn(self, requests: RequestReceiver) -> JoinHandle<DispatchReport> {
        tokio::spawn(self.run(requests))
    }

    pub async fn run(mut self, mut requests: RequestReceiver) -> DispatchReport {
        let mut trips: JoinSet<TripResult> = JoinSet::new();
        let mut completed = Vec::new();
        let mut dropped = Vec::new();
        let mut failures = Vec::new();

        while let Some(request) = requests.next().await {
            if let Some(unmatched) = self.dispatch(request, &mut trips) {
                dropped.push(unmatched);
            }
            while let Some(result) = trips.try_join_next() {
                collect_trip(result, &mut completed, &mut failures);
            }
        }

        info!(in_flight = trips.len(), "request queue drained, waiting for trips");
        while let Some(result) = trips.join_next().await {
            collect_trip(result, &mut completed, &mut failures);
        }

        let counts = self.telemetry.counts();
        info!(
            completed = completed.len(),
            dropped = dropped.len(),
            failed = failures.len(),
            "dispatch finished"
        );
        DispatchReport {
            completed,
            dropped,
            failures,
            counts,
            fleet: self.fleet.snapshot(),
        }
    }

    /// Try to assign one request. Returns the request back when no driver is
    /// available.
    fn dispatch(
        &mut self,
        mut request: RideRequest,
        trips: &mut JoinSet<TripResult>,
    ) -> Option<RideRequest> {
        self.telemetry.record(DispatchEvent::RequestReceived {
            request_id: request.id,
            origin: request.origin,
            destination: request.destination,
        });
        self.telemetry.record(DispatchEvent::SearchStarted {
            request_id: request.id,
        });

        let Some(reservation) = self.fleet.reserve_nearest(request.origin) else {
            self.telemetry.record(DispatchEvent::NoDriverAvailable {
                request_id: request.id,
            });
            return Some(request);
        };

        request.assigned_driver = Some(reservation.driver_id);
        self.telemetry.record(DispatchEvent::Assigned {
            request_id: request.id,
            driver_id: reservation.driver_id,
            pickup_distance: reservation.distance(),
        });

        let duration = self.trip_model.sample(&mut self.rng);
        trips.spawn(run_trip(
            self.fleet.clone(),
            self.telemetry.clone(),
            request,
            reservation.driver_id,
            duration,
        ));
        None
    }
}

const TRIP_SEED_OFFSET: u64 = 0x5EED_0007;

fn collect_trip(
    result: Result<TripResult, JoinError>,
    completed: &mut Vec<RideRequest>,
    failures: &mut Vec<DispatchError>,
) {
    match result {
        Ok(Ok(request)) => completed.push(request),
        Ok(Err(err)) => {
            error!(error = %err, "trip ended without releasing its driver");
            failures.push(err);
        }
        Err(join_err) => {
            error!(error = %join_err, "trip task did not complete");
            failures.push(DispatchError::Task {
                role: "trip",
                source: join_err,
            });
        }
    }
}

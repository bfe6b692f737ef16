//! Scenario harness: seeds a fleet, generates demand and drives one full
//! dispatch run.
//!
//! Each request gets its own producer task, started `inter_arrival` after the
//! previous one, so arrivals interleave the same way independent callers
//! would.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::task::JoinSet;
use tracing::info;

use crate::config::DispatchConfig;
use crate::dispatcher::{DispatchReport, Dispatcher};
use crate::error::DispatchError;
use crate::fleet::{Driver, DriverId, FleetRegistry};
use crate::queue::{request_queue, RequestSender};
use crate::request::{RequestId, RideRequest};
use crate::spatial::Coordinate;
use crate::telemetry::DispatchTelemetry;

fn random_coordinate<R: Rng>(rng: &mut R, extent: i32) -> Coordinate {
    Coordinate::new(rng.gen_range(0..extent), rng.gen_range(0..extent))
}

/// Drivers `1..=fleet_size`, all available, at random grid positions.
///
/// `fleet_size` must fit in a `u32`; `DispatchConfig::validate` enforces it.
pub fn seed_fleet<R: Rng>(config: &DispatchConfig, rng: &mut R) -> Vec<Driver> {
    (1u32..)
        .take(config.fleet_size)
        .map(|id| Driver::new(DriverId(id), random_coordinate(rng, config.grid_extent)))
        .collect()
}

/// Requests `1..=request_count` with random origin and destination.
pub fn generate_requests<R: Rng>(config: &DispatchConfig, rng: &mut R) -> Vec<RideRequest> {
    (1u64..)
        .take(config.request_count)
        .map(|id| {
            let origin = random_coordinate(rng, config.grid_extent);
            let destination = random_coordinate(rng, config.grid_extent);
            RideRequest::new(RequestId(id), origin, destination)
        })
        .collect()
}

/// Seed a fleet and demand from `config`, then run them through the
/// dispatcher until every trip has finished.
pub async fn run_scenario(config: &DispatchConfig) -> Result<DispatchReport, DispatchError> {
    config.validate()?;
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let fleet = FleetRegistry::new(seed_fleet(config, &mut rng))?;
    let requests = generate_requests(config, &mut rng);
    info!(
        drivers = fleet.len(),
        requests = requests.len(),
        "fleet initialised"
    );
    run_with(config, fleet, requests).await
}

/// Run an explicit fleet and request list through a fresh dispatcher.
pub async fn run_with(
    config: &DispatchConfig,
    fleet: FleetRegistry,
    requests: Vec<RideRequest>,
) -> Result<DispatchReport, DispatchError> {
    // The report carries counts only, so the event log is not retained.
    let telemetry = DispatchTelemetry::counts_only();
    let (sender, receiver) = request_queue(config.queue_capacity);
    let dispatcher = Dispatcher::from_config(fleet, telemetry, config).spawn(receiver);

    produce(sender, requests, config.inter_arrival()).await?;

    dispatcher.await.map_err(|source| DispatchError::Task {
        role: "dispatcher",
        source,
    })
}

async fn produce(
    sender: RequestSender,
    requests: Vec<RideRequest>,
    inter_arrival: std::time::Duration,
) -> Result<(), DispatchError> {
    let mut producers = JoinSet::new();
    for request in requests {
        let sender = sender.clone();
        producers.spawn(async move { sender.enqueue(request).await });
        tokio::time::sleep(inter_arrival).await;
    }
    drop(sender);

    while let Some(result) = producers.join_next().await {
        result.map_err(|source| DispatchError::Task {
            role: "producer",
            source,
        })??;
    }
    Ok(())
}

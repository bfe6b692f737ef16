mod support;

use std::collections::HashSet;
use std::sync::Arc;

use dispatch_core::{Coordinate, DriverId};
use support::fleet::FleetBuilder;
use tokio::sync::Barrier;

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_reservations_never_share_a_driver() {
    const AVAILABLE: usize = 6;
    const CALLERS: usize = 64;

    let fleet = FleetBuilder::new()
        .available_diagonal(AVAILABLE)
        .busy_at(1, 1)
        .busy_at(2, 2)
        .build();
    let barrier = Arc::new(Barrier::new(CALLERS));

    let mut handles = Vec::with_capacity(CALLERS);
    for caller in 0..CALLERS {
        let fleet = fleet.clone();
        let barrier = Arc::clone(&barrier);
        handles.push(tokio::spawn(async move {
            barrier.wait().await;
            let origin = Coordinate::new((caller % 50) as i32, (caller * 7 % 50) as i32);
            fleet.reserve_nearest(origin).map(|r| r.driver_id)
        }));
    }

    let mut winners = Vec::new();
    for handle in handles {
        if let Some(driver_id) = handle.await.expect("caller task") {
            winners.push(driver_id);
        }
    }

    let distinct: HashSet<DriverId> = winners.iter().copied().collect();
    assert_eq!(winners.len(), AVAILABLE, "exactly the available drivers are handed out");
    assert_eq!(distinct.len(), winners.len(), "no driver reserved twice");
    assert!(!distinct.contains(&DriverId(AVAILABLE as u32 + 1)));
    assert!(!distinct.contains(&DriverId(AVAILABLE as u32 + 2)));
    assert_eq!(fleet.available_count(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_releases_are_not_lost() {
    const DRIVERS: usize = 32;

    let fleet = FleetBuilder::new().available_diagonal(DRIVERS).build();
    while fleet.reserve_nearest(Coordinate::new(0, 0)).is_some() {}
    assert_eq!(fleet.available_count(), 0);

    let mut handles = Vec::new();
    for id in 1..=DRIVERS as u32 {
        let fleet = fleet.clone();
        handles.push(tokio::spawn(async move {
            fleet.release_at(DriverId(id), Coordinate::new(-(id as i32), id as i32))
        }));
    }
    for handle in handles {
        handle.await.expect("release task").expect("release");
    }

    let drivers = fleet.snapshot();
    assert!(drivers.iter().all(|d| d.available));
    for driver in drivers {
        let id = driver.id.0 as i32;
        assert_eq!(driver.location, Coordinate::new(-id, id));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn reservations_and_releases_interleave_safely() {
    const ROUNDS: usize = 200;

    let fleet = FleetBuilder::new().available_diagonal(3).build();
    let mut handles = Vec::new();
    for worker in 0..12 {
        let fleet = fleet.clone();
        handles.push(tokio::spawn(async move {
            let mut trips = 0;
            for round in 0..ROUNDS {
                let origin = Coordinate::new(worker * 3, (round % 40) as i32);
                if let Some(reservation) = fleet.reserve_nearest(origin) {
                    let held = fleet.driver(reservation.driver_id).expect("driver");
                    assert!(!held.available, "reserved driver must stay busy until released");
                    tokio::task::yield_now().await;
                    fleet
                        .release_at(reservation.driver_id, origin)
                        .expect("release");
                    trips += 1;
                } else {
                    tokio::task::yield_now().await;
                }
            }
            trips
        }));
    }

    let mut total = 0;
    for handle in handles {
        total += handle.await.expect("worker");
    }
    assert!(total > 0);
    assert_eq!(fleet.available_count(), 3);
}

#![allow(dead_code)]

use dispatch_core::{Coordinate, Driver, DriverId, FleetRegistry};

/// Builder for fleets with a mix of available and busy drivers. Ids are
/// assigned from 1 in insertion order.
#[derive(Clone, Debug, Default)]
pub struct FleetBuilder {
    drivers: Vec<Driver>,
}

impl FleetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn available_at(self, x: i32, y: i32) -> Self {
        self.push(x, y, true)
    }

    pub fn busy_at(self, x: i32, y: i32) -> Self {
        self.push(x, y, false)
    }

    /// `count` available drivers spread along the diagonal.
    pub fn available_diagonal(mut self, count: usize) -> Self {
        for step in 0..count as i32 {
            self = self.available_at(step * 10, step * 10);
        }
        self
    }

    pub fn build(self) -> FleetRegistry {
        FleetRegistry::new(self.drivers).expect("builder ids are unique")
    }

    fn push(mut self, x: i32, y: i32, available: bool) -> Self {
        let id = DriverId(self.drivers.len() as u32 + 1);
        self.drivers.push(Driver {
            id,
            location: Coordinate::new(x, y),
            available,
        });
        self
    }
}

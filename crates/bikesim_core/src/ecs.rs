//! Components and singleton resources owned by one simulation run.

use bevy_ecs::prelude::{Component, Resource};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::network::HubId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripStatus {
    InTransit,
    Completed,
}

/// A single rental in progress. Created the instant a checkout succeeds;
/// a request refused for lack of a bike never becomes a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Component)]
pub struct Trip {
    pub origin: HubId,
    /// Reassigned when the relocation search redirects a stranded trip.
    pub destination: HubId,
    /// Countdown to arrival; the hourly step subtracts 60.
    pub minutes_remaining: i32,
    pub status: TripStatus,
    pub requested_hour: usize,
    /// Times the trip was redirected by the relocation search.
    pub relocations: u32,
}

/// Per-hub bike stock with a uniform parking capacity.
///
/// `try_checkout` and `try_dock` are the only mutators, so
/// `0 <= stock <= capacity` holds at all times: an operation that would
/// leave the range is rejected, never clamped.
#[derive(Debug, Clone, Resource)]
pub struct BikeStock {
    stock: Vec<u32>,
    capacity: u32,
}

impl BikeStock {
    pub fn new(num_hubs: usize, initial: u32, capacity: u32) -> Result<Self, SimError> {
        if initial > capacity {
            return Err(SimError::InvalidConfig {
                reason: format!("{initial} initial bikes per hub exceeds capacity {capacity}"),
            });
        }
        Ok(Self {
            stock: vec![initial; num_hubs],
            capacity,
        })
    }

    /// Take one bike from `hub`. Returns `false` when the hub is empty.
    pub fn try_checkout(&mut self, hub: HubId) -> bool {
        if self.stock[hub] == 0 {
            return false;
        }
        self.stock[hub] -= 1;
        true
    }

    /// Park one bike at `hub`. Returns `false` when the hub is full.
    pub fn try_dock(&mut self, hub: HubId) -> bool {
        if self.stock[hub] >= self.capacity {
            return false;
        }
        self.stock[hub] += 1;
        true
    }

    pub fn has_room(&self, hub: HubId) -> bool {
        self.stock[hub] < self.capacity
    }

    pub fn stock(&self, hub: HubId) -> u32 {
        self.stock[hub]
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn total(&self) -> u32 {
        self.stock.iter().sum()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.stock
    }
}

/// Run configuration, fixed for the duration of one simulation.
#[derive(Debug, Clone, Copy, Resource, Serialize, Deserialize)]
pub struct SimConfig {
    pub max_bikes_per_hub: u32,
    pub initial_bikes_per_hub: u32,
    pub horizon_hours: usize,
}

/// The run's random generator. Every stochastic step draws from this
/// explicitly injected generator; nothing in the engine touches a
/// process-wide source, so independently seeded runs never interact.
#[derive(Debug, Resource)]
pub struct SimRng(pub StdRng);

/// Binned request counts per `(hub, hour)`, produced from the arrival
/// schedules before the run starts and read-only afterwards.
#[derive(Debug, Clone, Resource)]
pub struct HourlyDemand {
    counts: Vec<Vec<u32>>,
}

impl HourlyDemand {
    pub fn new(counts: Vec<Vec<u32>>) -> Self {
        Self { counts }
    }

    pub fn requests(&self, hub: HubId, hour: usize) -> u32 {
        self.counts[hub][hour]
    }

    pub fn num_hubs(&self) -> usize {
        self.counts.len()
    }

    pub fn total_requests(&self) -> u32 {
        self.counts.iter().flatten().sum()
    }
}

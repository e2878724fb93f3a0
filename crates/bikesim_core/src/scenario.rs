//! Scenario setup: generate per-hub arrival schedules and populate the
//! world with every resource one run needs.

use bevy_ecs::prelude::World;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::choice::{DestinationModel, DestinationModelResource};
use crate::clock::SimulationClock;
use crate::demand::{bin_events_by_hour, nonhomogeneous_poisson_times, HourlyDemandModel};
use crate::ecs::{BikeStock, HourlyDemand, SimConfig, SimRng};
use crate::error::SimError;
use crate::network::TravelTimeNetwork;
use crate::telemetry::{SimSnapshots, SimTelemetry};

const DEFAULT_MAX_BIKES_PER_HUB: u32 = 10;
const DEFAULT_INITIAL_BIKES_PER_HUB: u32 = 5;
const DEFAULT_HORIZON_HOURS: usize = 24;

/// Parameters for building a scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioParams {
    pub max_bikes_per_hub: u32,
    pub initial_bikes_per_hub: u32,
    pub horizon_hours: usize,
    /// Random seed for reproducibility (optional; if None, uses entropy).
    pub seed: Option<u64>,
}

impl Default for ScenarioParams {
    fn default() -> Self {
        Self {
            max_bikes_per_hub: DEFAULT_MAX_BIKES_PER_HUB,
            initial_bikes_per_hub: DEFAULT_INITIAL_BIKES_PER_HUB,
            horizon_hours: DEFAULT_HORIZON_HOURS,
            seed: None,
        }
    }
}

impl ScenarioParams {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_horizon_hours(mut self, hours: usize) -> Self {
        self.horizon_hours = hours;
        self
    }

    pub fn with_fleet(mut self, initial_bikes_per_hub: u32, max_bikes_per_hub: u32) -> Self {
        self.initial_bikes_per_hub = initial_bikes_per_hub;
        self.max_bikes_per_hub = max_bikes_per_hub;
        self
    }
}

/// Populates `world` with the clock, stock, telemetry, demand schedule and
/// model resources for one run.
///
/// All randomness descends from the master seed: each hub's arrival
/// generator gets its own derived generator, and the engine's draw stream
/// gets another, so a fixed seed makes the whole run reproducible and
/// concurrent runs share nothing.
pub fn build_scenario(
    world: &mut World,
    params: ScenarioParams,
    network: TravelTimeNetwork,
    demand: &dyn HourlyDemandModel,
    destination_model: Box<dyn DestinationModel>,
) -> Result<(), SimError> {
    let num_hubs = network.num_hubs();
    if demand.num_hubs() != num_hubs {
        return Err(SimError::InvalidConfig {
            reason: format!(
                "demand model covers {} hubs, network has {num_hubs}",
                demand.num_hubs()
            ),
        });
    }
    if destination_model.num_hubs() != num_hubs {
        return Err(SimError::InvalidConfig {
            reason: format!(
                "destination model covers {} hubs, network has {num_hubs}",
                destination_model.num_hubs()
            ),
        });
    }
    if params.horizon_hours == 0 {
        return Err(SimError::InvalidConfig {
            reason: "horizon must be at least one hour".to_string(),
        });
    }

    let mut master: StdRng = match params.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let horizon = params.horizon_hours;
    let mut counts = Vec::with_capacity(num_hubs);
    for hub in 0..num_hubs {
        let mut hub_rng = StdRng::seed_from_u64(master.gen());
        let profile = demand.hourly_intensity(hub);
        let times = nonhomogeneous_poisson_times(&profile, horizon as f64, &mut hub_rng)?;
        counts.push(bin_events_by_hour(&times, horizon));
    }

    let stock = BikeStock::new(
        num_hubs,
        params.initial_bikes_per_hub,
        params.max_bikes_per_hub,
    )?;

    world.insert_resource(SimulationClock::default());
    world.insert_resource(SimTelemetry::new(horizon));
    world.insert_resource(SimSnapshots::default());
    world.insert_resource(stock);
    world.insert_resource(SimConfig {
        max_bikes_per_hub: params.max_bikes_per_hub,
        initial_bikes_per_hub: params.initial_bikes_per_hub,
        horizon_hours: horizon,
    });
    world.insert_resource(SimRng(StdRng::seed_from_u64(master.gen())));
    world.insert_resource(network);
    world.insert_resource(DestinationModelResource(destination_model));
    world.insert_resource(HourlyDemand::new(counts));

    Ok(())
}

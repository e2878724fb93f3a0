//! Test helpers for common test setup and utilities.

use bevy_ecs::prelude::World;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::choice::{DestinationModel, DestinationModelResource};
use crate::clock::SimulationClock;
use crate::ecs::{BikeStock, HourlyDemand, SimConfig, SimRng};
use crate::network::{HubId, TravelTimeNetwork};
use crate::telemetry::{SimSnapshots, SimTelemetry};

/// A small asymmetric three-hub network used across test files.
pub fn test_network() -> TravelTimeNetwork {
    TravelTimeNetwork::from_matrix(vec![
        vec![0, 5, 9],
        vec![4, 0, 2],
        vec![8, 3, 0],
    ])
    .expect("test matrix is square")
}

/// Equal weight on every hub other than the origin.
#[derive(Debug)]
pub struct UniformChoice {
    pub num_hubs: usize,
}

impl DestinationModel for UniformChoice {
    fn destination_weights(&self, _origin: HubId, _hour: usize) -> Vec<f64> {
        vec![1.0; self.num_hubs]
    }

    fn num_hubs(&self) -> usize {
        self.num_hubs
    }
}

/// All weight on a single target hub. With `target == origin` the engine
/// sees an all-zero vector, which exercises the uniform fallback.
#[derive(Debug)]
pub struct FixedChoice {
    pub num_hubs: usize,
    pub target: HubId,
}

impl DestinationModel for FixedChoice {
    fn destination_weights(&self, origin: HubId, _hour: usize) -> Vec<f64> {
        let mut weights = vec![0.0; self.num_hubs];
        if self.target != origin {
            weights[self.target] = 1.0;
        }
        weights
    }

    fn num_hubs(&self) -> usize {
        self.num_hubs
    }
}

/// A minimal world over [`test_network`] with zero demand. Tests overwrite
/// the [`HourlyDemand`] resource when they need requests.
pub fn create_test_world() -> World {
    let mut world = World::new();
    let network = test_network();
    let num_hubs = network.num_hubs();
    world.insert_resource(SimulationClock::default());
    world.insert_resource(SimTelemetry::new(24));
    world.insert_resource(SimSnapshots::default());
    world.insert_resource(BikeStock::new(num_hubs, 5, 10).expect("valid fleet"));
    world.insert_resource(SimConfig {
        max_bikes_per_hub: 10,
        initial_bikes_per_hub: 5,
        horizon_hours: 24,
    });
    world.insert_resource(SimRng(StdRng::seed_from_u64(1)));
    world.insert_resource(network);
    world.insert_resource(DestinationModelResource(Box::new(UniformChoice {
        num_hubs,
    })));
    world.insert_resource(HourlyDemand::new(vec![vec![0; 24]; num_hubs]));
    world
}

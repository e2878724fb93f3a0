pub mod request_dispatch;
pub mod simulation_started;
pub mod stock_snapshot;
pub mod trip_arrival;

#[cfg(test)]
mod end_to_end_tests {
    use bevy_ecs::prelude::World;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::choice::DestinationModelResource;
    use crate::clock::SimulationClock;
    use crate::demand::ProfileDemand;
    use crate::ecs::{BikeStock, HourlyDemand, SimConfig, SimRng, Trip, TripStatus};
    use crate::network::TravelTimeNetwork;
    use crate::patterns::{campus_network, commuter_profile};
    use crate::runner::{initialize_simulation, run_until_empty, simulation_schedule};
    use crate::scenario::{build_scenario, ScenarioParams};
    use crate::telemetry::{
        collect_trip_records, SimSnapshots, SimTelemetry, TripOutcome,
    };
    use crate::test_helpers::{FixedChoice, UniformChoice};

    /// A world wired by hand so the demand counts are exact.
    fn manual_world(
        matrix: Vec<Vec<u32>>,
        initial: u32,
        capacity: u32,
        counts: Vec<Vec<u32>>,
        model: DestinationModelResource,
    ) -> World {
        let num_hubs = matrix.len();
        let mut world = World::new();
        world.insert_resource(SimulationClock::default());
        world.insert_resource(SimTelemetry::new(24));
        world.insert_resource(SimSnapshots::default());
        world.insert_resource(BikeStock::new(num_hubs, initial, capacity).unwrap());
        world.insert_resource(SimConfig {
            max_bikes_per_hub: capacity,
            initial_bikes_per_hub: initial,
            horizon_hours: 24,
        });
        world.insert_resource(SimRng(StdRng::seed_from_u64(3)));
        world.insert_resource(TravelTimeNetwork::from_matrix(matrix).unwrap());
        world.insert_resource(model);
        world.insert_resource(HourlyDemand::new(counts));
        world
    }

    fn run_to_completion(world: &mut World) {
        initialize_simulation(world);
        let mut schedule = simulation_schedule();
        let steps = run_until_empty(world, &mut schedule, 10_000);
        assert!(steps < 10_000, "runner did not converge");
    }

    #[test]
    fn two_hub_capacity_conflict_relocates_the_trip() {
        // One request at hub 0, hour 0, destined for hub 1 (5 minutes).
        // Hub 1 is full on arrival, so the trip records a no-parking event
        // and relocates to hub 0 — the slot its own checkout vacated —
        // with the 7-minute return time, docking at hour 2.
        let mut counts = vec![vec![0u32; 24]; 2];
        counts[0][0] = 1;
        let mut world = manual_world(
            vec![vec![0, 5], vec![7, 0]],
            1,
            1,
            counts,
            DestinationModelResource(Box::new(FixedChoice {
                num_hubs: 2,
                target: 1,
            })),
        );

        run_to_completion(&mut world);

        let telemetry = world.resource::<SimTelemetry>();
        assert_eq!(telemetry.no_bike_events().iter().sum::<u32>(), 0);
        assert_eq!(telemetry.no_parking_events()[1], 1);
        assert_eq!(telemetry.no_parking_events().iter().sum::<u32>(), 1);

        assert_eq!(telemetry.trip_records.len(), 1);
        let record = &telemetry.trip_records[0];
        assert_eq!(record.outcome, TripOutcome::Completed);
        assert_eq!(record.origin, 0);
        assert_eq!(record.destination, Some(0));
        assert_eq!(record.resolved_hour, Some(2));
        assert_eq!(record.relocations, 1);

        let stock = world.resource::<BikeStock>();
        assert_eq!(stock.as_slice(), &[1, 1]);

        // The hour-0 snapshot sees the bike gone and the trip in flight.
        let snapshots = world.resource::<SimSnapshots>();
        assert_eq!(snapshots.snapshots.len(), 24);
        assert_eq!(snapshots.snapshots[0].stock, vec![0, 1]);
        assert_eq!(snapshots.snapshots[0].trips_in_transit, 1);
        assert_eq!(snapshots.snapshots[2].trips_in_transit, 0);
    }

    #[test]
    fn request_at_empty_hub_is_lost_without_a_trip() {
        let mut counts = vec![vec![0u32; 24]; 2];
        counts[0][3] = 1;
        let mut world = manual_world(
            vec![vec![0, 5], vec![7, 0]],
            0,
            5,
            counts,
            DestinationModelResource(Box::new(UniformChoice { num_hubs: 2 })),
        );

        run_to_completion(&mut world);

        let telemetry = world.resource::<SimTelemetry>();
        assert_eq!(telemetry.no_bike_events()[3], 1);
        assert_eq!(telemetry.no_bike_events().iter().sum::<u32>(), 1);
        assert_eq!(world.query::<&Trip>().iter(&world).count(), 0);

        let records = collect_trip_records(&mut world);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].outcome, TripOutcome::FailedNoBike);
    }

    #[test]
    fn campus_day_conserves_bikes_and_bounds_stock() {
        let network = campus_network();
        let num_hubs = network.num_hubs();
        let demand =
            ProfileDemand::uniform(num_hubs, commuter_profile(4.0)).unwrap();
        let params = ScenarioParams::default().with_seed(42);
        let initial_total = params.initial_bikes_per_hub * num_hubs as u32;

        let mut world = World::new();
        build_scenario(
            &mut world,
            params,
            network,
            &demand,
            Box::new(UniformChoice { num_hubs }),
        )
        .unwrap();
        let total_requests = world.resource::<HourlyDemand>().total_requests();
        run_to_completion(&mut world);

        // Conservation at every hour: parked + riding is constant.
        let capacity = world.resource::<BikeStock>().capacity();
        let snapshots = world.resource::<SimSnapshots>();
        assert_eq!(snapshots.snapshots.len(), 24);
        for snapshot in &snapshots.snapshots {
            assert!(snapshot.stock.iter().all(|&s| s <= capacity));
            let riding = snapshot.trips_in_transit as u32;
            assert_eq!(snapshot.stock.iter().sum::<u32>() + riding, initial_total);
        }

        let in_transit = world
            .query::<&Trip>()
            .iter(&world)
            .filter(|trip| trip.status == TripStatus::InTransit)
            .count() as u32;
        assert_eq!(world.resource::<BikeStock>().total() + in_transit, initial_total);

        // Every request resolves into exactly one record.
        let records = collect_trip_records(&mut world);
        assert_eq!(records.len(), total_requests as usize);
        for record in &records {
            if let Some(destination) = record.destination {
                assert_ne!(destination, record.origin);
            }
        }
    }

    #[test]
    fn identical_seeds_give_identical_runs() {
        let run = |seed: u64| {
            let network = campus_network();
            let num_hubs = network.num_hubs();
            let demand =
                ProfileDemand::uniform(num_hubs, commuter_profile(5.0)).unwrap();
            let mut world = World::new();
            build_scenario(
                &mut world,
                ScenarioParams::default().with_seed(seed),
                network,
                &demand,
                Box::new(UniformChoice { num_hubs }),
            )
            .unwrap();
            run_to_completion(&mut world);
            let telemetry = world.resource::<SimTelemetry>();
            (
                telemetry.no_bike_events().to_vec(),
                telemetry.no_parking_events().to_vec(),
                world.resource::<BikeStock>().as_slice().to_vec(),
            )
        };

        assert_eq!(run(1234), run(1234));
    }
}

//! Dispatches the hour's new rental requests.
//!
//! Hubs are processed in id order and requests within a hub one at a time,
//! so the draw stream — and with it the whole run — is reproducible for a
//! fixed seed. A request at an empty hub is lost on the spot; a successful
//! checkout samples a destination, looks up the travel time and spawns an
//! in-transit trip.

use bevy_ecs::prelude::{Commands, Res, ResMut};

use crate::choice::{sample_destination, DestinationModelResource};
use crate::clock::{CurrentEvent, EventKind};
use crate::ecs::{BikeStock, HourlyDemand, SimRng, Trip, TripStatus};
use crate::network::TravelTimeNetwork;
use crate::telemetry::{SimTelemetry, TripOutcome, TripRecord};

pub fn request_dispatch_system(
    mut commands: Commands,
    event: Res<CurrentEvent>,
    demand: Res<HourlyDemand>,
    network: Res<TravelTimeNetwork>,
    model: Res<DestinationModelResource>,
    mut stock: ResMut<BikeStock>,
    mut telemetry: ResMut<SimTelemetry>,
    mut rng: ResMut<SimRng>,
) {
    if event.0.kind != EventKind::DispatchRequests {
        return;
    }
    let hour = event.0.timestamp as usize;
    let num_hubs = network.num_hubs();

    for hub in 0..demand.num_hubs() {
        for _ in 0..demand.requests(hub, hour) {
            if !stock.try_checkout(hub) {
                telemetry.record_no_bike(hour);
                telemetry.trip_records.push(TripRecord {
                    origin: hub,
                    destination: None,
                    outcome: TripOutcome::FailedNoBike,
                    requested_hour: hour,
                    resolved_hour: Some(hour),
                    relocations: 0,
                });
                continue;
            }

            let weights = model.0.destination_weights(hub, hour);
            let sample = sample_destination(&weights, num_hubs, hub, &mut rng.0);
            if sample.used_uniform_fallback {
                telemetry.record_uniform_fallback();
                log::warn!(
                    "unusable destination weights for hub {hub} at hour {hour}; \
                     fell back to a uniform draw"
                );
            }
            assert_ne!(
                sample.destination, hub,
                "destination sample equals origin at hub {hub}, hour {hour}"
            );

            let minutes = network.travel_time(hub, sample.destination);
            commands.spawn(Trip {
                origin: hub,
                destination: sample.destination,
                minutes_remaining: minutes as i32,
                status: TripStatus::InTransit,
                requested_hour: hour,
                relocations: 0,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::prelude::{Schedule, World};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::clock::Event;
    use crate::test_helpers::{test_network, FixedChoice, UniformChoice};

    fn dispatch_world(
        stock: BikeStock,
        counts: Vec<Vec<u32>>,
        model: DestinationModelResource,
        hour: u64,
    ) -> World {
        let mut world = World::new();
        world.insert_resource(test_network());
        world.insert_resource(stock);
        world.insert_resource(SimTelemetry::new(24));
        world.insert_resource(HourlyDemand::new(counts));
        world.insert_resource(model);
        world.insert_resource(SimRng(StdRng::seed_from_u64(9)));
        world.insert_resource(CurrentEvent(Event {
            timestamp: hour,
            kind: EventKind::DispatchRequests,
        }));
        world
    }

    fn run(world: &mut World) {
        let mut schedule = Schedule::default();
        schedule.add_systems(request_dispatch_system);
        schedule.run(world);
    }

    fn hour0_counts(per_hub: [u32; 3]) -> Vec<Vec<u32>> {
        per_hub
            .iter()
            .map(|&count| {
                let mut hours = vec![0u32; 24];
                hours[0] = count;
                hours
            })
            .collect()
    }

    #[test]
    fn empty_hub_records_no_bike_and_creates_no_trip() {
        let mut world = dispatch_world(
            BikeStock::new(3, 0, 5).unwrap(),
            hour0_counts([1, 0, 0]),
            DestinationModelResource(Box::new(UniformChoice { num_hubs: 3 })),
            0,
        );
        run(&mut world);

        let telemetry = world.resource::<SimTelemetry>();
        assert_eq!(telemetry.no_bike_events()[0], 1);
        assert_eq!(telemetry.trip_records.len(), 1);
        assert_eq!(telemetry.trip_records[0].outcome, TripOutcome::FailedNoBike);
        assert_eq!(telemetry.trip_records[0].destination, None);
        assert_eq!(world.query::<&Trip>().iter(&world).count(), 0);
    }

    #[test]
    fn checkout_spawns_trip_with_network_travel_time() {
        let mut world = dispatch_world(
            BikeStock::new(3, 2, 5).unwrap(),
            hour0_counts([1, 0, 0]),
            DestinationModelResource(Box::new(FixedChoice {
                num_hubs: 3,
                target: 2,
            })),
            0,
        );
        run(&mut world);

        assert_eq!(world.resource::<BikeStock>().stock(0), 1);
        let trip = world.query::<&Trip>().single(&world);
        assert_eq!(trip.origin, 0);
        assert_eq!(trip.destination, 2);
        assert_eq!(trip.minutes_remaining, 9);
        assert_eq!(trip.status, TripStatus::InTransit);
        assert_eq!(
            world
                .resource::<SimTelemetry>()
                .no_bike_events()
                .iter()
                .sum::<u32>(),
            0
        );
    }

    #[test]
    fn degenerate_weights_use_audited_uniform_fallback() {
        // A model that returns all-zero weights for every draw.
        let mut world = dispatch_world(
            BikeStock::new(3, 2, 5).unwrap(),
            hour0_counts([2, 0, 0]),
            DestinationModelResource(Box::new(FixedChoice {
                num_hubs: 3,
                target: 0, // target == origin, so every weight ends up zero
            })),
            0,
        );
        run(&mut world);

        let telemetry = world.resource::<SimTelemetry>();
        assert_eq!(telemetry.uniform_fallbacks, 2);
        let trips: Vec<_> = world.query::<&Trip>().iter(&world).collect();
        assert_eq!(trips.len(), 2);
        for trip in trips {
            assert_ne!(trip.destination, 0);
        }
    }

    #[test]
    fn demand_beyond_stock_splits_into_trips_and_losses() {
        let mut world = dispatch_world(
            BikeStock::new(3, 2, 5).unwrap(),
            hour0_counts([4, 0, 0]),
            DestinationModelResource(Box::new(UniformChoice { num_hubs: 3 })),
            0,
        );
        run(&mut world);

        assert_eq!(world.resource::<BikeStock>().stock(0), 0);
        assert_eq!(world.resource::<SimTelemetry>().no_bike_events()[0], 2);
        assert_eq!(world.query::<&Trip>().iter(&world).count(), 2);
    }
}

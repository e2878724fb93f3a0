//! Advances in-flight trips by one hour and resolves arrivals.
//!
//! Runs before the hour's new requests are dispatched, so a slot vacated
//! by a completed trip is available to checkouts in the same hour. A trip
//! whose destination is full triggers the cascading relocation search:
//! the nearest hub with room becomes the new destination, with the travel
//! time from the stranded hub as the new countdown. If no hub anywhere
//! has room the trip retries the same destination next hour.

use bevy_ecs::prelude::{Query, Res, ResMut};

use crate::clock::{CurrentEvent, EventKind};
use crate::ecs::{BikeStock, Trip, TripStatus};
use crate::network::TravelTimeNetwork;
use crate::telemetry::{SimTelemetry, TripOutcome, TripRecord};

pub fn trip_arrival_system(
    event: Res<CurrentEvent>,
    network: Res<TravelTimeNetwork>,
    mut stock: ResMut<BikeStock>,
    mut telemetry: ResMut<SimTelemetry>,
    mut trips: Query<&mut Trip>,
) {
    if event.0.kind != EventKind::AdvanceTrips {
        return;
    }
    let hour = event.0.timestamp as usize;

    for mut trip in trips.iter_mut() {
        if trip.status != TripStatus::InTransit {
            continue;
        }

        trip.minutes_remaining -= 60;
        if trip.minutes_remaining > 0 {
            continue;
        }

        let destination = trip.destination;
        if stock.try_dock(destination) {
            trip.status = TripStatus::Completed;
            telemetry.trip_records.push(TripRecord {
                origin: trip.origin,
                destination: Some(destination),
                outcome: TripOutcome::Completed,
                requested_hour: trip.requested_hour,
                resolved_hour: Some(hour),
                relocations: trip.relocations,
            });
            continue;
        }

        telemetry.record_no_parking(hour);

        // Relocation search: nearest hub with a free slot, using the
        // candidate order precomputed by the network.
        let new_destination = network
            .hubs_by_distance(destination)
            .iter()
            .copied()
            .find(|&candidate| stock.has_room(candidate));

        match new_destination {
            Some(candidate) => {
                trip.minutes_remaining = network.travel_time(destination, candidate) as i32;
                trip.destination = candidate;
                trip.relocations += 1;
            }
            None => {
                // Nowhere to park anywhere: retry this destination next hour.
                trip.minutes_remaining = 60;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::prelude::{Schedule, World};

    use crate::clock::Event;
    use crate::test_helpers::test_network;

    fn advance_world(stock: BikeStock, hour: u64) -> World {
        let mut world = World::new();
        world.insert_resource(test_network());
        world.insert_resource(stock);
        world.insert_resource(SimTelemetry::new(24));
        world.insert_resource(CurrentEvent(Event {
            timestamp: hour,
            kind: EventKind::AdvanceTrips,
        }));
        world
    }

    fn run(world: &mut World) {
        let mut schedule = Schedule::default();
        schedule.add_systems(trip_arrival_system);
        schedule.run(world);
    }

    #[test]
    fn trip_still_riding_keeps_counting_down() {
        let mut world = advance_world(BikeStock::new(3, 1, 5).unwrap(), 0);
        let entity = world
            .spawn(Trip {
                origin: 0,
                destination: 1,
                minutes_remaining: 90,
                status: TripStatus::InTransit,
                requested_hour: 0,
                relocations: 0,
            })
            .id();

        run(&mut world);

        let trip = world.entity(entity).get::<Trip>().unwrap();
        assert_eq!(trip.minutes_remaining, 30);
        assert_eq!(trip.status, TripStatus::InTransit);
    }

    #[test]
    fn arrival_docks_when_destination_has_room() {
        let mut world = advance_world(BikeStock::new(3, 1, 5).unwrap(), 4);
        let entity = world
            .spawn(Trip {
                origin: 0,
                destination: 1,
                minutes_remaining: 5,
                status: TripStatus::InTransit,
                requested_hour: 3,
                relocations: 0,
            })
            .id();

        run(&mut world);

        let trip = world.entity(entity).get::<Trip>().unwrap();
        assert_eq!(trip.status, TripStatus::Completed);
        assert_eq!(world.resource::<BikeStock>().stock(1), 2);

        let telemetry = world.resource::<SimTelemetry>();
        assert_eq!(telemetry.no_parking_events().iter().sum::<u32>(), 0);
        assert_eq!(telemetry.trip_records.len(), 1);
        assert_eq!(telemetry.trip_records[0].resolved_hour, Some(4));
    }

    #[test]
    fn full_destination_relocates_to_nearest_with_room() {
        // Hub 1 full; from hub 1 the candidate order is [2, 0] (2 min vs 4).
        let mut stock = BikeStock::new(3, 1, 2).unwrap();
        assert!(stock.try_dock(1));
        let mut world = advance_world(stock, 2);
        let entity = world
            .spawn(Trip {
                origin: 0,
                destination: 1,
                minutes_remaining: 5,
                status: TripStatus::InTransit,
                requested_hour: 1,
                relocations: 0,
            })
            .id();

        run(&mut world);

        let trip = world.entity(entity).get::<Trip>().unwrap();
        assert_eq!(trip.status, TripStatus::InTransit);
        assert_eq!(trip.destination, 2);
        assert_eq!(trip.minutes_remaining, 2);
        assert_eq!(trip.relocations, 1);
        assert_eq!(
            world.resource::<SimTelemetry>().no_parking_events()[2],
            1
        );
    }

    #[test]
    fn no_room_anywhere_retries_next_hour() {
        // Every hub at capacity: the trip keeps its destination and gets a
        // fresh 60-minute countdown.
        let mut world = advance_world(BikeStock::new(3, 1, 1).unwrap(), 5);
        let entity = world
            .spawn(Trip {
                origin: 0,
                destination: 1,
                minutes_remaining: 30,
                status: TripStatus::InTransit,
                requested_hour: 4,
                relocations: 0,
            })
            .id();

        run(&mut world);

        let trip = world.entity(entity).get::<Trip>().unwrap();
        assert_eq!(trip.status, TripStatus::InTransit);
        assert_eq!(trip.destination, 1);
        assert_eq!(trip.minutes_remaining, 60);
        assert_eq!(trip.relocations, 0);
        assert_eq!(
            world.resource::<SimTelemetry>().no_parking_events()[5],
            1
        );
    }
}

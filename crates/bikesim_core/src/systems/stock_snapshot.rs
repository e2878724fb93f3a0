//! Captures the per-hub stock and in-flight count at the end of each hour.

use bevy_ecs::prelude::{Query, Res, ResMut};

use crate::clock::{CurrentEvent, EventKind};
use crate::ecs::{BikeStock, Trip, TripStatus};
use crate::telemetry::{SimSnapshots, StockSnapshot};

pub fn stock_snapshot_system(
    event: Res<CurrentEvent>,
    stock: Res<BikeStock>,
    trips: Query<&Trip>,
    mut snapshots: ResMut<SimSnapshots>,
) {
    if event.0.kind != EventKind::CaptureSnapshot {
        return;
    }

    let trips_in_transit = trips
        .iter()
        .filter(|trip| trip.status == TripStatus::InTransit)
        .count();
    snapshots.snapshots.push(StockSnapshot {
        hour: event.0.timestamp as usize,
        stock: stock.as_slice().to_vec(),
        trips_in_transit,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::prelude::{Schedule, World};

    use crate::clock::Event;

    #[test]
    fn snapshot_captures_stock_and_in_flight_count() {
        let mut world = World::new();
        world.insert_resource(BikeStock::new(2, 3, 5).unwrap());
        world.insert_resource(SimSnapshots::default());
        world.insert_resource(CurrentEvent(Event {
            timestamp: 8,
            kind: EventKind::CaptureSnapshot,
        }));
        world.spawn(Trip {
            origin: 0,
            destination: 1,
            minutes_remaining: 12,
            status: TripStatus::InTransit,
            requested_hour: 8,
            relocations: 0,
        });
        world.spawn(Trip {
            origin: 1,
            destination: 0,
            minutes_remaining: 0,
            status: TripStatus::Completed,
            requested_hour: 6,
            relocations: 0,
        });

        let mut schedule = Schedule::default();
        schedule.add_systems(stock_snapshot_system);
        schedule.run(&mut world);

        let snapshots = world.resource::<SimSnapshots>();
        assert_eq!(snapshots.snapshots.len(), 1);
        let snapshot = &snapshots.snapshots[0];
        assert_eq!(snapshot.hour, 8);
        assert_eq!(snapshot.stock, vec![3, 3]);
        assert_eq!(snapshot.trips_in_transit, 1);
    }
}

//! Reacts to SimulationStarted and pre-schedules the hourly loop.

use bevy_ecs::prelude::{Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, SimulationClock};
use crate::ecs::SimConfig;

/// Schedules, for every hour of the horizon, the advance/dispatch/snapshot
/// events. Their within-hour order comes from [`EventKind`] ordering, not
/// from scheduling order.
pub fn simulation_started_system(
    mut clock: ResMut<SimulationClock>,
    config: Res<SimConfig>,
    event: Res<CurrentEvent>,
) {
    if event.0.kind != EventKind::SimulationStarted {
        return;
    }

    for hour in 0..config.horizon_hours as u64 {
        clock.schedule_at(hour, EventKind::AdvanceTrips);
        clock.schedule_at(hour, EventKind::DispatchRequests);
        clock.schedule_at(hour, EventKind::CaptureSnapshot);
    }
}

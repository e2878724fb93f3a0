//! Travel-time network: a complete directed graph over the hub set.
//!
//! Built once per run from a square minute matrix and immutable afterwards.
//! Alongside the raw lookup table the constructor precomputes, for every
//! hub, the list of other hubs sorted by outbound travel time — the
//! relocation search walks that list instead of sorting per event.

use bevy_ecs::prelude::Resource;

use crate::error::SimError;

pub type HubId = usize;

#[derive(Debug, Clone, Resource)]
pub struct TravelTimeNetwork {
    minutes: Vec<Vec<u32>>,
    /// Per hub, the other hubs ordered by increasing travel time from it.
    /// Ties break on hub id so the order is stable within a run.
    nearest: Vec<Vec<HubId>>,
}

impl TravelTimeNetwork {
    /// Build the network from a square travel-time matrix in minutes.
    /// `minutes[u][v]` is the one-way time from `u` to `v`; the diagonal is
    /// ignored (no self-loop is ever traversed).
    pub fn from_matrix(minutes: Vec<Vec<u32>>) -> Result<Self, SimError> {
        let n = minutes.len();
        if n < 2 {
            return Err(SimError::InvalidTravelMatrix {
                reason: format!("need at least two hubs, got {n}"),
            });
        }
        for (row_idx, row) in minutes.iter().enumerate() {
            if row.len() != n {
                return Err(SimError::InvalidTravelMatrix {
                    reason: format!(
                        "row {row_idx} has {} entries, expected {n}",
                        row.len()
                    ),
                });
            }
        }

        let nearest = (0..n)
            .map(|u| {
                let mut candidates: Vec<HubId> = (0..n).filter(|&v| v != u).collect();
                candidates.sort_by_key(|&v| (minutes[u][v], v));
                candidates
            })
            .collect();

        Ok(Self { minutes, nearest })
    }

    pub fn num_hubs(&self) -> usize {
        self.minutes.len()
    }

    /// One-way travel time in minutes between two distinct hubs.
    ///
    /// # Panics
    ///
    /// Panics on a self-loop or an out-of-range hub. The network is
    /// complete by construction, so either means the run is operating on a
    /// hub that does not exist — an invariant violation, not a recoverable
    /// condition.
    pub fn travel_time(&self, from: HubId, to: HubId) -> u32 {
        assert_ne!(
            from, to,
            "travel time queried for self-loop at hub {from}"
        );
        let n = self.num_hubs();
        assert!(
            from < n && to < n,
            "travel time queried for out-of-range pair ({from}, {to}) in a {n}-hub network"
        );
        self.minutes[from][to]
    }

    /// Other hubs ordered by increasing travel time from `from`.
    pub fn hubs_by_distance(&self, from: HubId) -> &[HubId] {
        &self.nearest[from]
    }

    /// The underlying minute matrix (used by choice models that weight on
    /// travel time).
    pub fn minutes(&self) -> &[Vec<u32>] {
        &self.minutes
    }
}

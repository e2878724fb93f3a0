//! Destination-choice models: pluggable providers of per-hub, per-hour
//! destination weights, selected behind a trait object resource.
//!
//! Two implementations: a logit model scoring destinations on travel time,
//! elevation and the (log-)size of the crowd around the destination, and a
//! static time-of-day probability table. Weights need not sum to one — the
//! engine renormalizes — but must be non-negative; the entry for the
//! origin itself is always treated as zero.

use bevy_ecs::prelude::Resource;
use rand::rngs::StdRng;
use rand::Rng;

use crate::demand::HOURS_PER_DAY;
use crate::error::SimError;
use crate::network::HubId;

/// Trait for destination-choice backends. Implementations must be
/// `Send + Sync` so the model can be stored as a shared ECS resource.
pub trait DestinationModel: Send + Sync + std::fmt::Debug {
    /// Non-negative weights over all hubs for a checkout at `origin`
    /// during `hour`. The origin's own entry is ignored by the engine.
    fn destination_weights(&self, origin: HubId, hour: usize) -> Vec<f64>;

    fn num_hubs(&self) -> usize;
}

/// ECS resource wrapping a boxed destination model.
#[derive(Debug, Resource)]
pub struct DestinationModelResource(pub Box<dyn DestinationModel>);

/// Dense `(hub, hour)` table of crowd sizes around each hub.
///
/// Replaces the nested mapping-of-mappings of ad-hoc data files: every
/// entry exists by construction, so there is no silent default for a
/// missing key, and an out-of-range lookup is an invariant violation.
#[derive(Debug, Clone)]
pub struct SizeTable {
    counts: Vec<Vec<f64>>,
}

impl SizeTable {
    pub fn new(counts: Vec<Vec<f64>>) -> Result<Self, SimError> {
        for (hub, row) in counts.iter().enumerate() {
            if row.len() != HOURS_PER_DAY {
                return Err(SimError::InvalidDestinationModel {
                    reason: format!(
                        "size table for hub {hub} has {} hours, expected {HOURS_PER_DAY}",
                        row.len()
                    ),
                });
            }
            if let Some(&bad) = row.iter().find(|c| !c.is_finite() || **c < 0.0) {
                return Err(SimError::InvalidDestinationModel {
                    reason: format!("size table for hub {hub} contains {bad}"),
                });
            }
        }
        Ok(Self { counts })
    }

    pub fn num_hubs(&self) -> usize {
        self.counts.len()
    }

    /// Crowd size around `hub` during `hour`.
    ///
    /// # Panics
    ///
    /// Panics on an out-of-range hub or hour.
    pub fn count(&self, hub: HubId, hour: usize) -> f64 {
        assert!(
            hub < self.counts.len() && hour < HOURS_PER_DAY,
            "size table lookup out of range: hub {hub}, hour {hour}"
        );
        self.counts[hub][hour]
    }
}

/// Logit destination choice: utility is linear in travel time, elevation
/// gain and log crowd size, exponentiated into weights.
#[derive(Debug, Clone)]
pub struct LogitDestinationModel {
    beta_time: f64,
    beta_elevation: f64,
    beta_ln_size: f64,
    travel_minutes: Vec<Vec<u32>>,
    elevation: Vec<Vec<f64>>,
    sizes: SizeTable,
}

impl LogitDestinationModel {
    pub fn new(
        travel_minutes: Vec<Vec<u32>>,
        elevation: Vec<Vec<f64>>,
        sizes: SizeTable,
        beta_time: f64,
        beta_elevation: f64,
        beta_ln_size: f64,
    ) -> Result<Self, SimError> {
        let n = travel_minutes.len();
        if elevation.len() != n
            || travel_minutes.iter().any(|row| row.len() != n)
            || elevation.iter().any(|row| row.len() != n)
        {
            return Err(SimError::InvalidDestinationModel {
                reason: "travel and elevation matrices must be square and the same size"
                    .to_string(),
            });
        }
        if sizes.num_hubs() != n {
            return Err(SimError::InvalidDestinationModel {
                reason: format!(
                    "size table covers {} hubs, matrices cover {n}",
                    sizes.num_hubs()
                ),
            });
        }
        Ok(Self {
            beta_time,
            beta_elevation,
            beta_ln_size,
            travel_minutes,
            elevation,
            sizes,
        })
    }

    fn utility(&self, origin: HubId, destination: HubId, hour: usize) -> f64 {
        let minutes = f64::from(self.travel_minutes[origin][destination]);
        let climb = self.elevation[origin][destination];
        let size = self.sizes.count(destination, hour).max(1.0); // prevent log(0)
        -self.beta_time * minutes - self.beta_elevation * climb
            + self.beta_ln_size * size.ln()
    }
}

impl DestinationModel for LogitDestinationModel {
    fn destination_weights(&self, origin: HubId, hour: usize) -> Vec<f64> {
        (0..self.num_hubs())
            .map(|dest| {
                if dest == origin {
                    0.0
                } else {
                    self.utility(origin, dest, hour).exp()
                }
            })
            .collect()
    }

    fn num_hubs(&self) -> usize {
        self.travel_minutes.len()
    }
}

/// One block of hours sharing a destination-probability matrix.
#[derive(Debug, Clone)]
pub struct TimeBand {
    /// Hours of the day this band covers (e.g. `[21, 22, 23, 0, ..., 6]`).
    pub hours: Vec<usize>,
    /// `probabilities[origin][destination]`, non-negative.
    pub probabilities: Vec<Vec<f64>>,
}

/// Static time-of-day destination table: a probability matrix per band of
/// hours, with every hour of the day covered exactly once.
#[derive(Debug, Clone)]
pub struct TimeBandTable {
    band_for_hour: [usize; HOURS_PER_DAY],
    bands: Vec<Vec<Vec<f64>>>,
    num_hubs: usize,
}

impl TimeBandTable {
    pub fn new(bands: Vec<TimeBand>) -> Result<Self, SimError> {
        let num_hubs = bands
            .first()
            .map(|band| band.probabilities.len())
            .ok_or_else(|| SimError::InvalidDestinationModel {
                reason: "time-band table needs at least one band".to_string(),
            })?;

        let mut band_for_hour = [usize::MAX; HOURS_PER_DAY];
        for (band_idx, band) in bands.iter().enumerate() {
            if band.probabilities.len() != num_hubs
                || band.probabilities.iter().any(|row| row.len() != num_hubs)
            {
                return Err(SimError::InvalidDestinationModel {
                    reason: format!("band {band_idx} matrix is not {num_hubs}x{num_hubs}"),
                });
            }
            if band
                .probabilities
                .iter()
                .flatten()
                .any(|p| !p.is_finite() || *p < 0.0)
            {
                return Err(SimError::InvalidDestinationModel {
                    reason: format!("band {band_idx} contains a negative or non-finite probability"),
                });
            }
            for &hour in &band.hours {
                if hour >= HOURS_PER_DAY {
                    return Err(SimError::InvalidDestinationModel {
                        reason: format!("band {band_idx} names hour {hour}"),
                    });
                }
                if band_for_hour[hour] != usize::MAX {
                    return Err(SimError::InvalidDestinationModel {
                        reason: format!("hour {hour} is covered by more than one band"),
                    });
                }
                band_for_hour[hour] = band_idx;
            }
        }
        if let Some(hour) = band_for_hour.iter().position(|&b| b == usize::MAX) {
            return Err(SimError::InvalidDestinationModel {
                reason: format!("hour {hour} is not covered by any band"),
            });
        }

        Ok(Self {
            band_for_hour,
            bands: bands.into_iter().map(|b| b.probabilities).collect(),
            num_hubs,
        })
    }
}

impl DestinationModel for TimeBandTable {
    fn destination_weights(&self, origin: HubId, hour: usize) -> Vec<f64> {
        let mut weights = self.bands[self.band_for_hour[hour]][origin].clone();
        weights[origin] = 0.0;
        weights
    }

    fn num_hubs(&self) -> usize {
        self.num_hubs
    }
}

/// Outcome of one destination draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DestinationSample {
    pub destination: HubId,
    /// The model's weights were unusable (wrong length, zero or non-finite
    /// sum) and the draw fell back to a uniform choice over the other hubs.
    pub used_uniform_fallback: bool,
}

/// Draw a destination for a checkout at `origin` from model weights.
///
/// The origin's entry is forced to zero before renormalizing, so the draw
/// can never return the origin. A malformed weight vector is recovered
/// locally with a uniform distribution over the remaining hubs; callers
/// surface the fallback through telemetry.
pub fn sample_destination(
    weights: &[f64],
    num_hubs: usize,
    origin: HubId,
    rng: &mut StdRng,
) -> DestinationSample {
    debug_assert!(num_hubs >= 2);

    let usable = weights.len() == num_hubs
        && weights.iter().all(|w| w.is_finite() && *w >= 0.0);
    let total: f64 = if usable {
        weights
            .iter()
            .enumerate()
            .filter(|(hub, _)| *hub != origin)
            .map(|(_, w)| w)
            .sum()
    } else {
        0.0
    };

    if !usable || total <= 0.0 {
        // Uniform over the other hubs.
        let pick = rng.gen_range(0..num_hubs - 1);
        let destination = if pick >= origin { pick + 1 } else { pick };
        return DestinationSample {
            destination,
            used_uniform_fallback: true,
        };
    }

    let draw = rng.gen::<f64>() * total;
    let mut acc = 0.0;
    let mut chosen = None;
    for (hub, &weight) in weights.iter().enumerate() {
        if hub == origin || weight == 0.0 {
            continue;
        }
        acc += weight;
        chosen = Some(hub);
        if draw < acc {
            break;
        }
    }
    // Rounding can leave `draw` at the tail; the last positive-weight hub
    // absorbs it.
    let destination = chosen.expect("positive total implies a positive-weight hub");
    DestinationSample {
        destination,
        used_uniform_fallback: false,
    }
}

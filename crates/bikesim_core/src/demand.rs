//! Demand generation: non-homogeneous Poisson arrivals and hourly binning.
//!
//! Request times for one hub and one day are drawn with Lewis–Shedler
//! thinning: exponential candidate gaps at the envelope rate `λ_max`, each
//! candidate accepted with probability `λ(t) / λ_max` where `λ(t)` is the
//! piecewise-constant hourly intensity. The envelope makes the
//! accept/reject test exact without a closed-form inverse CDF.

use rand::rngs::StdRng;
use rand::Rng;

use crate::error::SimError;
use crate::network::HubId;

pub const HOURS_PER_DAY: usize = 24;

/// Validate an hourly intensity profile: exactly 24 entries, all finite
/// and non-negative. Runs before any sampling.
fn validate_profile(profile: &[f64]) -> Result<(), SimError> {
    if profile.len() != HOURS_PER_DAY {
        return Err(SimError::InvalidIntensityProfile {
            reason: format!(
                "expected {HOURS_PER_DAY} hourly intensities, got {}",
                profile.len()
            ),
        });
    }
    if let Some((hour, &lam)) = profile
        .iter()
        .enumerate()
        .find(|(_, &lam)| !lam.is_finite() || lam < 0.0)
    {
        return Err(SimError::InvalidIntensityProfile {
            reason: format!("intensity for hour {hour} is {lam}, must be finite and >= 0"),
        });
    }
    Ok(())
}

/// Generate one day of request times for a single hub.
///
/// Returns fractional-hour timestamps, ascending, in `[0, horizon_hours)`.
/// The expected count in hour `h` is `profile[h]`. A profile whose maximum
/// is zero yields an empty schedule — a valid terminal case, not an error.
/// The sequence is fully determined by `rng`.
pub fn nonhomogeneous_poisson_times(
    profile: &[f64],
    horizon_hours: f64,
    rng: &mut StdRng,
) -> Result<Vec<f64>, SimError> {
    validate_profile(profile)?;

    let lam_max = profile.iter().cloned().fold(0.0_f64, f64::max);
    if lam_max == 0.0 {
        return Ok(Vec::new());
    }

    // Piecewise-constant intensity; the index clamp absorbs floating-point
    // spill at the upper boundary (t ≈ 24 landing on index 24).
    let lam_at = |t: f64| profile[(t as usize).min(HOURS_PER_DAY - 1)];

    let mut events = Vec::new();
    let mut t = exponential_gap(rng, lam_max);
    while t < horizon_hours {
        if rng.gen::<f64>() < lam_at(t) / lam_max {
            events.push(t);
        }
        t += exponential_gap(rng, lam_max);
    }

    debug_assert!(events.windows(2).all(|w| w[0] <= w[1]));
    Ok(events)
}

/// Sample from exponential: -ln(U) / rate, where U is uniform [0,1).
fn exponential_gap(rng: &mut StdRng, rate: f64) -> f64 {
    let u: f64 = rng.gen();
    let u = u.max(1e-10); // avoid log(0)
    -u.ln() / rate
}

/// Fold continuous event times into per-hour request counts.
/// Times at or past the horizon are counted in the final hour.
pub fn bin_events_by_hour(times: &[f64], horizon_hours: usize) -> Vec<u32> {
    let mut bins = vec![0u32; horizon_hours];
    for &time in times {
        let hour = (time as usize).min(horizon_hours - 1);
        bins[hour] += 1;
    }
    bins
}

/// Convert an hourly population curve into an hourly intensity profile:
/// `λ[h] = round(min(population[h] * trip_probability, cap))`.
pub fn hourly_lambdas_from_population(
    population: &[f64],
    trip_probability: f64,
    cap: f64,
) -> Result<Vec<f64>, SimError> {
    if !(0.0 < trip_probability && trip_probability <= 1.0) {
        return Err(SimError::InvalidConfig {
            reason: format!("trip probability must be in (0, 1], got {trip_probability}"),
        });
    }
    if population.len() != HOURS_PER_DAY {
        return Err(SimError::InvalidConfig {
            reason: format!(
                "expected {HOURS_PER_DAY} hourly population counts, got {}",
                population.len()
            ),
        });
    }
    Ok(population
        .iter()
        .map(|&pop| (pop * trip_probability).min(cap).round())
        .collect())
}

/// Source of hourly rental intensity per hub — the demand-side external
/// interface of the engine.
pub trait HourlyDemandModel: Send + Sync + std::fmt::Debug {
    /// The 24-entry intensity profile for `hub`.
    fn hourly_intensity(&self, hub: HubId) -> Vec<f64>;

    fn num_hubs(&self) -> usize;
}

/// Demand given directly as one intensity profile per hub.
#[derive(Debug, Clone)]
pub struct ProfileDemand {
    profiles: Vec<Vec<f64>>,
}

impl ProfileDemand {
    pub fn new(profiles: Vec<Vec<f64>>) -> Result<Self, SimError> {
        for profile in &profiles {
            validate_profile(profile)?;
        }
        Ok(Self { profiles })
    }

    /// The same profile at every one of `num_hubs` hubs.
    pub fn uniform(num_hubs: usize, profile: Vec<f64>) -> Result<Self, SimError> {
        validate_profile(&profile)?;
        Ok(Self {
            profiles: vec![profile; num_hubs],
        })
    }
}

impl HourlyDemandModel for ProfileDemand {
    fn hourly_intensity(&self, hub: HubId) -> Vec<f64> {
        self.profiles[hub].clone()
    }

    fn num_hubs(&self) -> usize {
        self.profiles.len()
    }
}

/// Demand derived from hourly population counts around each hub, converted
/// with a per-hub trip probability and capped.
#[derive(Debug, Clone)]
pub struct PopulationDemand {
    lambdas: Vec<Vec<f64>>,
}

impl PopulationDemand {
    pub fn new(
        populations: Vec<Vec<f64>>,
        trip_probabilities: Vec<f64>,
        cap: f64,
    ) -> Result<Self, SimError> {
        if populations.len() != trip_probabilities.len() {
            return Err(SimError::InvalidConfig {
                reason: format!(
                    "{} population curves but {} trip probabilities",
                    populations.len(),
                    trip_probabilities.len()
                ),
            });
        }
        let lambdas = populations
            .iter()
            .zip(&trip_probabilities)
            .map(|(pop, &p)| hourly_lambdas_from_population(pop, p, cap))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { lambdas })
    }
}

impl HourlyDemandModel for PopulationDemand {
    fn hourly_intensity(&self, hub: HubId) -> Vec<f64> {
        self.lambdas[hub].clone()
    }

    fn num_hubs(&self) -> usize {
        self.lambdas.len()
    }
}

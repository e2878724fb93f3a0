//! Configuration errors raised before a run starts.
//!
//! Everything here is rejected fast, during construction or scenario
//! building. Once the hourly loop is running, the remaining failure modes
//! are invariant violations (self-loop trip, out-of-range lookup) which
//! abort the run with hub/hour context instead of returning.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    /// The hourly intensity array is malformed (wrong length, negative or
    /// non-finite entries).
    #[error("invalid intensity profile: {reason}")]
    InvalidIntensityProfile { reason: String },

    /// The travel-time matrix is not a square matrix over at least two hubs.
    #[error("invalid travel-time matrix: {reason}")]
    InvalidTravelMatrix { reason: String },

    /// A destination-choice model was constructed with inconsistent or
    /// out-of-range data.
    #[error("invalid destination model: {reason}")]
    InvalidDestinationModel { reason: String },

    /// Scenario-level configuration is inconsistent (e.g. more initial
    /// bikes than parking capacity, zero-hour horizon).
    #[error("invalid scenario configuration: {reason}")]
    InvalidConfig { reason: String },
}

//! Default deployment data: the campus network and an hourly usage shape.
//!
//! The travel-time matrix covers ten hubs around a small college town;
//! minutes are one-way riding times and the matrix is deliberately
//! asymmetric (hills cut one direction short).

use crate::choice::{LogitDestinationModel, SizeTable};
use crate::network::TravelTimeNetwork;

pub const NUM_CAMPUS_HUBS: usize = 10;

pub const CAMPUS_HUB_NAMES: [&str; NUM_CAMPUS_HUBS] = [
    "twilight",
    "athletic_complex",
    "student_center",
    "kinney_drugs",
    "food_coop",
    "hannaford",
    "porter_hospital",
    "amtrak_station",
    "bihall",
    "bus_stop",
];

/// One-way riding time in minutes, `[from][to]`.
pub const CAMPUS_TRAVEL_MINUTES: [[u32; NUM_CAMPUS_HUBS]; NUM_CAMPUS_HUBS] = [
    [0, 11, 11, 6, 6, 13, 6, 10, 8, 7],
    [7, 0, 6, 4, 8, 9, 5, 6, 3, 4],
    [11, 7, 0, 5, 10, 12, 7, 9, 4, 4],
    [5, 5, 5, 0, 6, 9, 3, 6, 3, 1],
    [4, 11, 11, 5, 0, 7, 4, 10, 8, 6],
    [11, 11, 13, 10, 8, 0, 8, 7, 10, 10],
    [5, 8, 9, 3, 4, 5, 0, 8, 6, 4],
    [8, 6, 9, 5, 9, 7, 6, 0, 6, 6],
    [6, 5, 3, 2, 7, 9, 4, 5, 0, 1],
    [5, 5, 5, 1, 6, 9, 3, 6, 2, 0],
];

/// Hour-by-hour demand shape relative to the daily peak: quiet overnight,
/// a class-change morning ramp, and an afternoon/evening peak.
pub const COMMUTER_HOURLY_PATTERN: [f64; 24] = [
    0.05, // 12 AM
    0.02, // 1 AM
    0.0,  // 2 AM
    0.0,  // 3 AM
    0.0,  // 4 AM
    0.02, // 5 AM
    0.1,  // 6 AM
    0.4,  // 7 AM
    0.8,  // 8 AM (morning classes)
    0.7,  // 9 AM
    0.6,  // 10 AM
    0.6,  // 11 AM
    0.9,  // 12 PM (lunch peak)
    0.7,  // 1 PM
    0.6,  // 2 PM
    0.7,  // 3 PM
    0.9,  // 4 PM (afternoon peak)
    1.0,  // 5 PM (evening peak)
    0.8,  // 6 PM
    0.6,  // 7 PM
    0.4,  // 8 PM
    0.3,  // 9 PM
    0.2,  // 10 PM
    0.1,  // 11 PM
];

/// The default ten-hub campus network.
pub fn campus_network() -> TravelTimeNetwork {
    let matrix = CAMPUS_TRAVEL_MINUTES
        .iter()
        .map(|row| row.to_vec())
        .collect();
    TravelTimeNetwork::from_matrix(matrix).expect("campus matrix is square")
}

/// Default campus destination choice: a logit model over the travel-time
/// matrix with flat terrain and equal crowd sizes, i.e. a pure
/// gravity-by-travel-time model. Deployments with elevation and crowd data
/// construct [`LogitDestinationModel`] directly.
pub fn campus_choice_model() -> LogitDestinationModel {
    let travel = CAMPUS_TRAVEL_MINUTES
        .iter()
        .map(|row| row.to_vec())
        .collect();
    let elevation = vec![vec![0.0; NUM_CAMPUS_HUBS]; NUM_CAMPUS_HUBS];
    let sizes = SizeTable::new(vec![vec![1.0; 24]; NUM_CAMPUS_HUBS])
        .expect("flat size table is valid");
    LogitDestinationModel::new(travel, elevation, sizes, 0.25, 0.25, 0.75)
        .expect("campus matrices are consistent")
}

/// Scale the commuter shape to a profile peaking at `peak_requests_per_hour`.
pub fn commuter_profile(peak_requests_per_hour: f64) -> Vec<f64> {
    COMMUTER_HOURLY_PATTERN
        .iter()
        .map(|&share| share * peak_requests_per_hour)
        .collect()
}

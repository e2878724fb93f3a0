pub mod choice;
pub mod clock;
pub mod demand;
pub mod ecs;
pub mod error;
pub mod network;
pub mod patterns;
pub mod runner;
pub mod scenario;
pub mod systems;
pub mod telemetry;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

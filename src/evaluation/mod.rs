//! Ride evaluation: validate input, predict speed, derive physics.

pub mod orchestrator;

pub use orchestrator::{EvalError, RideEvaluation, RideEvaluator, RiderProfile};

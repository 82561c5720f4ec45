//! CyclePredict - Cycling Performance Prediction
//!
//! Estimates a cyclist's average speed for a planned ride using a trained
//! regression model, then derives power output and calories burned from that
//! speed with a closed-form physics model. Each evaluation can be appended to
//! a ride history log and rendered as a performance report.

pub mod config;
pub mod evaluation;
pub mod features;
pub mod history;
pub mod model;
pub mod physics;
pub mod report;
pub mod training;

// Re-export commonly used types
pub use evaluation::{RideEvaluation, RideEvaluator, RiderProfile};
pub use features::{build_features, FeatureRecord, RideInput, RouteType};
pub use model::{SpeedPredictor, TrainedModelArtifact};
pub use physics::{energy_kcal, estimate_power_watts, PhysicsResult};

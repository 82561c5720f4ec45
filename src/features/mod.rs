//! Ride input records and feature engineering.

pub mod builder;
pub mod types;

pub use builder::{build_features, MIN_DISTANCE_KM, MIN_RIDE_TIME_MIN};
pub use types::{FeatureRecord, RideInput, RouteType};

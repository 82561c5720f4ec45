//! Record types for the prediction pipeline.
//!
//! One struct per pipeline stage: `RideInput` is what the user supplies,
//! `FeatureRecord` is the input extended with the derived columns the model
//! was trained on.

use serde::{Deserialize, Serialize};

/// Route profile category.
///
/// The trained categories are flat/rolling/climb; anything else is carried
/// through as [`RouteType::Other`] and handled by the encoder's
/// unknown-category policy (all-zero encoding) rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RouteType {
    /// Mostly level terrain
    Flat,
    /// Undulating terrain with repeated short climbs
    Rolling,
    /// Sustained climbing
    Climb,
    /// A category not in the trained set
    Other(String),
}

impl RouteType {
    /// Canonical string form, as stored in training data and CSV rows.
    pub fn as_str(&self) -> &str {
        match self {
            RouteType::Flat => "flat",
            RouteType::Rolling => "rolling",
            RouteType::Climb => "climb",
            RouteType::Other(s) => s.as_str(),
        }
    }
}

impl From<String> for RouteType {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "flat" => RouteType::Flat,
            "rolling" => RouteType::Rolling,
            "climb" => RouteType::Climb,
            _ => RouteType::Other(value.trim().to_lowercase()),
        }
    }
}

impl From<RouteType> for String {
    fn from(value: RouteType) -> Self {
        value.as_str().to_string()
    }
}

impl From<&str> for RouteType {
    fn from(value: &str) -> Self {
        RouteType::from(value.to_string())
    }
}

impl std::fmt::Display for RouteType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One planned ride's parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideInput {
    /// Planned distance in kilometers (must be > 0)
    pub distance_km: f64,
    /// Total elevation gain in meters (must be >= 0)
    pub elevation_gain_m: f64,
    /// Planned ride time in minutes (must be > 0)
    pub ride_time_min: f64,
    /// Expected temperature in Celsius
    pub temperature_c: f64,
    /// Route profile category
    pub route_type: RouteType,
}

/// A [`RideInput`] extended with derived feature columns.
///
/// The derived fields start out as `None` and are filled in by
/// [`build_features`](crate::features::build_features); the predictor
/// requires both to be present. Keeping them optional mirrors the
/// conditional column guards used at training time, which is what makes the
/// builder idempotent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub distance_km: f64,
    pub elevation_gain_m: f64,
    pub ride_time_min: f64,
    pub temperature_c: f64,
    pub route_type: RouteType,
    /// Elevation gain per kilometer (derived)
    pub elevation_per_km: Option<f64>,
    /// Average speed implied by distance and planned time (derived)
    pub computed_speed_kmph: Option<f64>,
}

impl From<RideInput> for FeatureRecord {
    fn from(input: RideInput) -> Self {
        Self {
            distance_km: input.distance_km,
            elevation_gain_m: input.elevation_gain_m,
            ride_time_min: input.ride_time_min,
            temperature_c: input.temperature_c,
            route_type: input.route_type,
            elevation_per_km: None,
            computed_speed_kmph: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_type_parsing() {
        assert_eq!(RouteType::from("flat"), RouteType::Flat);
        assert_eq!(RouteType::from("Rolling"), RouteType::Rolling);
        assert_eq!(RouteType::from(" climb "), RouteType::Climb);
        assert_eq!(
            RouteType::from("gravel"),
            RouteType::Other("gravel".to_string())
        );
    }

    #[test]
    fn test_route_type_round_trip() {
        for raw in ["flat", "rolling", "climb", "gravel"] {
            let parsed = RouteType::from(raw);
            assert_eq!(parsed.as_str(), raw);
        }
    }

    #[test]
    fn test_feature_record_from_input_has_no_derived_fields() {
        let input = RideInput {
            distance_km: 30.0,
            elevation_gain_m: 200.0,
            ride_time_min: 90.0,
            temperature_c: 28.0,
            route_type: RouteType::Flat,
        };

        let record = FeatureRecord::from(input);
        assert!(record.elevation_per_km.is_none());
        assert!(record.computed_speed_kmph.is_none());
    }
}

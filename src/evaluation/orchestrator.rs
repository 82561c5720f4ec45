//! The evaluation orchestrator composing the feature builder, speed
//! predictor, and physics estimator into one request/response operation.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::features::{build_features, FeatureRecord, RideInput};
use crate::model::{PredictError, SpeedPredictor};
use crate::physics::PhysicsResult;

/// Errors surfaced by [`RideEvaluator::evaluate`].
#[derive(Debug, Error)]
pub enum EvalError {
    /// The ride input violates a positivity/range invariant.
    ///
    /// Raised before any feature building or model access.
    #[error("invalid ride input: {reason}")]
    InvalidInput {
        /// Human-readable reason
        reason: String,
    },

    /// Model loading or inference failed.
    #[error(transparent)]
    Predict(#[from] PredictError),
}

/// Rider-specific parameters supplied alongside a [`RideInput`].
///
/// Kept out of `RideInput` because they describe the rider, not the ride.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiderProfile {
    /// Display name, used for history records and reports
    pub name: String,
    /// Rider weight in kilograms
    pub rider_weight_kg: f64,
    /// Bike + equipment weight in kilograms
    pub bike_weight_kg: f64,
}

impl RiderProfile {
    /// Combined rider + equipment mass, as the physics estimator expects.
    pub fn total_mass_kg(&self) -> f64 {
        self.rider_weight_kg + self.bike_weight_kg
    }
}

/// The serializable result bundle of a successful evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RideEvaluation {
    /// The evaluated ride parameters
    pub input: RideInput,
    /// Predicted average speed in km/h
    pub speed_kmph: f64,
    /// Power and energy derived from the predicted speed
    pub physics: PhysicsResult,
}

/// Evaluates planned rides against the trained model.
pub struct RideEvaluator {
    predictor: SpeedPredictor,
}

impl RideEvaluator {
    /// Create an evaluator around an existing predictor.
    pub fn new(predictor: SpeedPredictor) -> Self {
        Self { predictor }
    }

    /// Create an evaluator for the model artifact at `path`.
    pub fn with_model_path(path: impl Into<std::path::PathBuf>) -> Self {
        Self::new(SpeedPredictor::new(path))
    }

    /// Evaluate one planned ride.
    ///
    /// Validates the input, builds features, predicts the speed, then derives
    /// grade, power, and calories. Any failure before the physics step aborts
    /// the whole evaluation; no partial result is produced.
    pub fn evaluate(
        &self,
        input: &RideInput,
        profile: &RiderProfile,
    ) -> Result<RideEvaluation, EvalError> {
        validate_input(input)?;

        let features: FeatureRecord = build_features(input.clone().into());
        let speed_kmph = self.predictor.predict_speed(&features)?;
        debug!(speed_kmph, "Predicted average speed");

        let physics = PhysicsResult::derive(
            speed_kmph,
            input.elevation_gain_m,
            input.distance_km,
            input.ride_time_min,
            profile.total_mass_kg(),
        );

        Ok(RideEvaluation {
            input: input.clone(),
            speed_kmph,
            physics,
        })
    }
}

fn validate_input(input: &RideInput) -> Result<(), EvalError> {
    let fail = |reason: String| Err(EvalError::InvalidInput { reason });

    if !input.distance_km.is_finite() || input.distance_km <= 0.0 {
        return fail(format!(
            "distance_km must be positive, got {}",
            input.distance_km
        ));
    }
    if !input.ride_time_min.is_finite() || input.ride_time_min <= 0.0 {
        return fail(format!(
            "ride_time_min must be positive, got {}",
            input.ride_time_min
        ));
    }
    if !input.elevation_gain_m.is_finite() || input.elevation_gain_m < 0.0 {
        return fail(format!(
            "elevation_gain_m must be non-negative, got {}",
            input.elevation_gain_m
        ));
    }
    if !input.temperature_c.is_finite() {
        return fail(format!(
            "temperature_c must be finite, got {}",
            input.temperature_c
        ));
    }

    Ok(())
}

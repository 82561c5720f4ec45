//! Speed predictor with a lazily-loaded, process-cached model artifact.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock, PoisonError};

use tracing::info;

use crate::features::FeatureRecord;
use crate::model::artifact::TrainedModelArtifact;
use crate::model::types::PredictError;

/// Wraps the trained pipeline and owns its cached, read-only instance for
/// the lifetime of the process.
///
/// The artifact is loaded on first use with a double-checked initialization:
/// concurrent first access performs at most one load, and once loaded the
/// artifact is never replaced.
pub struct SpeedPredictor {
    artifact_path: PathBuf,
    artifact: OnceLock<TrainedModelArtifact>,
    load_guard: Mutex<()>,
}

impl SpeedPredictor {
    /// Create a predictor for the artifact at `path`. No IO happens until
    /// the first prediction.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            artifact_path: path.into(),
            artifact: OnceLock::new(),
            load_guard: Mutex::new(()),
        }
    }

    /// The configured artifact location.
    pub fn artifact_path(&self) -> &Path {
        &self.artifact_path
    }

    /// Whether the artifact has been loaded yet.
    pub fn is_loaded(&self) -> bool {
        self.artifact.get().is_some()
    }

    /// Get the cached artifact, loading it on first access.
    pub fn artifact(&self) -> Result<&TrainedModelArtifact, PredictError> {
        if let Some(artifact) = self.artifact.get() {
            return Ok(artifact);
        }

        // Serialize the first load; re-check under the guard so losers of
        // the race reuse the winner's artifact.
        let _guard = self
            .load_guard
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(artifact) = self.artifact.get() {
            return Ok(artifact);
        }

        let loaded = TrainedModelArtifact::load(&self.artifact_path)?;
        info!(path = %self.artifact_path.display(), "Loaded model artifact");
        Ok(self.artifact.get_or_init(|| loaded))
    }

    /// Predict the average speed (km/h) for a fully-built feature record.
    ///
    /// The model output is returned as-is: no clamping, no uncertainty
    /// estimate.
    pub fn predict_speed(&self, record: &FeatureRecord) -> Result<f64, PredictError> {
        self.artifact()?.predict(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{build_features, RideInput, RouteType};
    use crate::model::forest::{ForestConfig, RandomForest};
    use crate::model::preprocess::Preprocessor;

    fn record() -> FeatureRecord {
        build_features(
            RideInput {
                distance_km: 30.0,
                elevation_gain_m: 200.0,
                ride_time_min: 90.0,
                temperature_c: 28.0,
                route_type: RouteType::Flat,
            }
            .into(),
        )
    }

    fn write_artifact(path: &Path) {
        let records: Vec<FeatureRecord> = (1..=10)
            .map(|i| {
                build_features(
                    RideInput {
                        distance_km: i as f64 * 10.0,
                        elevation_gain_m: i as f64 * 30.0,
                        ride_time_min: i as f64 * 20.0,
                        temperature_c: 20.0,
                        route_type: RouteType::Flat,
                    }
                    .into(),
                )
            })
            .collect();
        let preprocessor = Preprocessor::fit(&records).unwrap();
        let x: Vec<Vec<f64>> = records
            .iter()
            .map(|r| preprocessor.transform(r).unwrap())
            .collect();
        let y: Vec<f64> = (1..=10).map(|i| 18.0 + i as f64 * 0.5).collect();
        let forest = RandomForest::fit(
            &x,
            &y,
            &ForestConfig {
                n_trees: 5,
                max_depth: 4,
                min_samples_leaf: 1,
                seed: 3,
            },
        );

        TrainedModelArtifact {
            preprocessor,
            forest,
        }
        .save(path)
        .unwrap();
    }

    #[test]
    fn test_lazy_load_and_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        write_artifact(&path);

        let predictor = SpeedPredictor::new(&path);
        assert!(!predictor.is_loaded());

        let first = predictor.predict_speed(&record()).unwrap();
        assert!(predictor.is_loaded());

        // Deleting the file after the first load must not matter.
        std::fs::remove_file(&path).unwrap();
        let second = predictor.predict_speed(&record()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_concurrent_first_access_loads_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        write_artifact(&path);

        let predictor = SpeedPredictor::new(&path);

        // Race the first access from many threads; every caller must end up
        // with the same cached artifact instance.
        let addresses: Vec<usize> = std::thread::scope(|scope| {
            (0..16)
                .map(|_| {
                    scope.spawn(|| {
                        predictor.artifact().unwrap() as *const TrainedModelArtifact as usize
                    })
                })
                .collect::<Vec<_>>()
                .into_iter()
                .map(|handle| handle.join().unwrap())
                .collect()
        });

        assert!(predictor.is_loaded());
        assert!(addresses.windows(2).all(|pair| pair[0] == pair[1]));
    }

    #[test]
    fn test_missing_artifact_is_model_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let predictor = SpeedPredictor::new(dir.path().join("missing.json"));

        let err = predictor.predict_speed(&record()).unwrap_err();
        assert!(matches!(err, PredictError::ModelNotFound { .. }));
        assert!(!predictor.is_loaded());
    }

    #[test]
    fn test_unknown_route_type_still_predicts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        write_artifact(&path);

        let predictor = SpeedPredictor::new(&path);
        let mut rec = record();
        rec.route_type = RouteType::Other("gravel".to_string());

        // Unknown category falls back to the all-zero encoding.
        let speed = predictor.predict_speed(&rec).unwrap();
        assert!(speed.is_finite());
    }
}

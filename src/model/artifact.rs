//! The persisted model artifact: fitted preprocessing plus fitted forest.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::features::FeatureRecord;
use crate::model::forest::RandomForest;
use crate::model::preprocess::Preprocessor;
use crate::model::types::PredictError;

/// A fitted preprocessing transform and regression model, produced once by
/// the training procedure and loaded read-only at inference time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainedModelArtifact {
    pub preprocessor: Preprocessor,
    pub forest: RandomForest,
}

impl TrainedModelArtifact {
    /// Load an artifact from a JSON file.
    ///
    /// A missing file and a corrupt file both surface as
    /// [`PredictError::ModelNotFound`]; neither is defaulted.
    pub fn load(path: &Path) -> Result<Self, PredictError> {
        let content = fs::read_to_string(path).map_err(|e| PredictError::ModelNotFound {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| PredictError::ModelNotFound {
            path: path.to_path_buf(),
            reason: format!("corrupt artifact: {e}"),
        })
    }

    /// Serialize the artifact to a JSON file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), PredictError> {
        let write_err = |reason: String| PredictError::ArtifactWrite {
            path: path.to_path_buf(),
            reason,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| write_err(e.to_string()))?;
        }

        let content = serde_json::to_string(self).map_err(|e| write_err(e.to_string()))?;
        fs::write(path, content).map_err(|e| write_err(e.to_string()))
    }

    /// Predict a speed (km/h) for a fully-built feature record.
    pub fn predict(&self, record: &FeatureRecord) -> Result<f64, PredictError> {
        let features = self.preprocessor.transform(record)?;
        Ok(self.forest.predict(&features))
    }
}

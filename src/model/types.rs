//! Error types for model loading and inference.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the speed predictor.
#[derive(Debug, Error)]
pub enum PredictError {
    /// The model artifact is missing or cannot be read/parsed.
    ///
    /// Fatal for every prediction request until the artifact is restored;
    /// never masked as a default prediction.
    #[error("model artifact not found or unreadable at {path}: {reason}")]
    ModelNotFound {
        /// Configured artifact location
        path: PathBuf,
        /// Underlying IO/parse failure
        reason: String,
    },

    /// The feature record is missing a column the model requires.
    ///
    /// Schema drift between training and inference time; never silently
    /// coerced to a guessed default.
    #[error("feature record is missing required column '{column}'")]
    FeatureMismatch {
        /// Name of the absent column
        column: String,
    },

    /// The model artifact could not be written.
    #[error("failed to write model artifact to {path}: {reason}")]
    ArtifactWrite {
        /// Destination path
        path: PathBuf,
        /// Underlying IO/serialization failure
        reason: String,
    },
}

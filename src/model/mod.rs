//! Speed prediction model: preprocessing, forest inference, and the
//! persisted artifact that bundles both.

pub mod artifact;
pub mod forest;
pub mod predictor;
pub mod preprocess;
pub mod types;

pub use artifact::TrainedModelArtifact;
pub use forest::{ForestConfig, RandomForest, TreeNode};
pub use predictor::SpeedPredictor;
pub use preprocess::{OneHotEncoder, Preprocessor, StandardScaler};
pub use types::PredictError;

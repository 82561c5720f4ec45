//! Offline training: raw-data cleaning and model fitting.
//!
//! Nothing here runs on the prediction path; the output is the model
//! artifact consumed read-only by the speed predictor.

pub mod dataset;
pub mod trainer;

pub use dataset::{clean_raw_data, load_training_rows, CleanSummary, DatasetError, TrainingRow};
pub use trainer::{fit_model, train_from_csv, TrainConfig, TrainError, TrainReport};

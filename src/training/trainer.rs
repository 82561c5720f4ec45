//! Model fitting: feature building, preprocessing fit, forest fit, and
//! artifact serialization.

use std::path::Path;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use thiserror::Error;
use tracing::info;

use crate::features::{build_features, FeatureRecord};
use crate::model::{ForestConfig, PredictError, Preprocessor, RandomForest, TrainedModelArtifact};
use crate::training::dataset::{load_training_rows, DatasetError, TrainingRow};

/// Training configuration.
#[derive(Debug, Clone, Copy)]
pub struct TrainConfig {
    /// Forest hyperparameters
    pub forest: ForestConfig,
    /// Fraction of rows held out for the MAE report
    pub test_fraction: f64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            forest: ForestConfig::default(),
            test_fraction: 0.2,
        }
    }
}

/// Errors from the training procedure.
#[derive(Debug, Error)]
pub enum TrainError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Model(#[from] PredictError),

    #[error("insufficient training data: {rows} rows, need at least {min}")]
    InsufficientData { rows: usize, min: usize },
}

/// Summary of a completed training run.
#[derive(Debug, Clone, Copy)]
pub struct TrainReport {
    pub rows_total: usize,
    pub rows_train: usize,
    pub rows_test: usize,
    /// Mean absolute error (km/h) on the holdout split, when one exists
    pub holdout_mae: Option<f64>,
}

const MIN_TRAINING_ROWS: usize = 10;

/// Fit the full pipeline (preprocessing + forest) on training rows.
///
/// Rows are shuffled with the configured seed and split train/holdout; the
/// preprocessing is fit on the training split only. The target column never
/// enters the feature matrix.
pub fn fit_model(
    rows: &[TrainingRow],
    config: &TrainConfig,
) -> Result<(TrainedModelArtifact, TrainReport), TrainError> {
    if rows.len() < MIN_TRAINING_ROWS {
        return Err(TrainError::InsufficientData {
            rows: rows.len(),
            min: MIN_TRAINING_ROWS,
        });
    }

    let records: Vec<FeatureRecord> = rows
        .iter()
        .map(|r| build_features(r.input.clone().into()))
        .collect();

    let mut indices: Vec<usize> = (0..rows.len()).collect();
    let mut rng = StdRng::seed_from_u64(config.forest.seed);
    indices.shuffle(&mut rng);

    let n_test = ((rows.len() as f64) * config.test_fraction.clamp(0.0, 0.5)).round() as usize;
    let (test_idx, train_idx) = indices.split_at(n_test);

    let train_records: Vec<FeatureRecord> =
        train_idx.iter().map(|&i| records[i].clone()).collect();
    let preprocessor = Preprocessor::fit(&train_records)?;

    let x_train = train_records
        .iter()
        .map(|r| preprocessor.transform(r))
        .collect::<Result<Vec<_>, _>>()?;
    let y_train: Vec<f64> = train_idx.iter().map(|&i| rows[i].target).collect();

    let forest = RandomForest::fit(&x_train, &y_train, &config.forest);
    let artifact = TrainedModelArtifact {
        preprocessor,
        forest,
    };

    let holdout_mae = if test_idx.is_empty() {
        None
    } else {
        let mut abs_err = 0.0;
        for &i in test_idx {
            let predicted = artifact.predict(&records[i])?;
            abs_err += (predicted - rows[i].target).abs();
        }
        Some(abs_err / test_idx.len() as f64)
    };

    let report = TrainReport {
        rows_total: rows.len(),
        rows_train: train_idx.len(),
        rows_test: test_idx.len(),
        holdout_mae,
    };

    Ok((artifact, report))
}

/// Train from a processed CSV and write the artifact to `model_path`.
pub fn train_from_csv(
    data_path: &Path,
    model_path: &Path,
    config: &TrainConfig,
) -> Result<TrainReport, TrainError> {
    let rows = load_training_rows(data_path)?;
    let (artifact, report) = fit_model(&rows, config)?;
    artifact.save(model_path)?;

    info!(
        rows = report.rows_total,
        holdout_mae = report.holdout_mae,
        model = %model_path.display(),
        "Model trained and saved"
    );

    Ok(report)
}

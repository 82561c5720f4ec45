//! Fitted preprocessing: numeric scaling and categorical encoding.
//!
//! Mirrors the configuration the model was trained with — standard scaling
//! for the numeric columns and one-hot encoding for `route_type` with
//! unknown categories encoded as all zeros rather than rejected.

use serde::{Deserialize, Serialize};

use crate::features::FeatureRecord;
use crate::model::types::PredictError;

/// Numeric feature columns, in training order.
pub const NUMERIC_COLUMNS: [&str; 6] = [
    "distance_km",
    "elevation_gain_m",
    "ride_time_min",
    "temperature_c",
    "elevation_per_km",
    "computed_speed_kmph",
];

/// The single categorical feature column.
pub const CATEGORICAL_COLUMN: &str = "route_type";

/// Extract the numeric columns of a record in training order.
///
/// Fails with [`PredictError::FeatureMismatch`] when a derived column has not
/// been filled in by the feature builder.
pub fn numeric_row(record: &FeatureRecord) -> Result<Vec<f64>, PredictError> {
    let elevation_per_km = record
        .elevation_per_km
        .ok_or_else(|| PredictError::FeatureMismatch {
            column: "elevation_per_km".to_string(),
        })?;
    let computed_speed_kmph =
        record
            .computed_speed_kmph
            .ok_or_else(|| PredictError::FeatureMismatch {
                column: "computed_speed_kmph".to_string(),
            })?;

    Ok(vec![
        record.distance_km,
        record.elevation_gain_m,
        record.ride_time_min,
        record.temperature_c,
        elevation_per_km,
        computed_speed_kmph,
    ])
}

/// Per-column standardization: `(x - mean) / std`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Per-column means
    pub means: Vec<f64>,
    /// Per-column standard deviations (constant columns stored as 1.0)
    pub stds: Vec<f64>,
}

impl StandardScaler {
    /// Fit means and standard deviations over the given rows.
    pub fn fit(rows: &[Vec<f64>]) -> Self {
        let n_cols = rows.first().map_or(0, Vec::len);
        let n = rows.len().max(1) as f64;

        let mut means = vec![0.0; n_cols];
        for row in rows {
            for (col, value) in row.iter().enumerate() {
                means[col] += value;
            }
        }
        for mean in &mut means {
            *mean /= n;
        }

        let mut stds = vec![0.0; n_cols];
        for row in rows {
            for (col, value) in row.iter().enumerate() {
                let d = value - means[col];
                stds[col] += d * d;
            }
        }
        for std in &mut stds {
            *std = (*std / n).sqrt();
            // A constant column scales by 1 instead of dividing by zero.
            if *std < 1e-12 {
                *std = 1.0;
            }
        }

        Self { means, stds }
    }

    /// Standardize one row.
    pub fn transform(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(self.means.iter().zip(self.stds.iter()))
            .map(|(x, (mean, std))| (x - mean) / std)
            .collect()
    }
}

/// One-hot encoder over the categories seen at training time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneHotEncoder {
    /// Ordered category list learned from training data
    pub categories: Vec<String>,
}

impl OneHotEncoder {
    /// Fit the category list (sorted, deduplicated) from training values.
    pub fn fit(values: &[String]) -> Self {
        let mut categories: Vec<String> = values.to_vec();
        categories.sort();
        categories.dedup();
        Self { categories }
    }

    /// Encode one value. A category unseen at training time encodes as all
    /// zeros instead of failing.
    pub fn encode(&self, value: &str) -> Vec<f64> {
        self.categories
            .iter()
            .map(|c| if c == value { 1.0 } else { 0.0 })
            .collect()
    }
}

/// The fitted preprocessing transform applied before the regressor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preprocessor {
    pub scaler: StandardScaler,
    pub encoder: OneHotEncoder,
}

impl Preprocessor {
    /// Fit scaling and encoding over fully-built feature records.
    pub fn fit(records: &[FeatureRecord]) -> Result<Self, PredictError> {
        let rows = records
            .iter()
            .map(numeric_row)
            .collect::<Result<Vec<_>, _>>()?;
        let values: Vec<String> = records
            .iter()
            .map(|r| r.route_type.as_str().to_string())
            .collect();

        Ok(Self {
            scaler: StandardScaler::fit(&rows),
            encoder: OneHotEncoder::fit(&values),
        })
    }

    /// Transform a record into the model's feature vector: scaled numeric
    /// columns followed by the one-hot block.
    pub fn transform(&self, record: &FeatureRecord) -> Result<Vec<f64>, PredictError> {
        let mut features = self.scaler.transform(&numeric_row(record)?);
        features.extend(self.encoder.encode(record.route_type.as_str()));
        Ok(features)
    }

    /// Total feature vector length.
    pub fn feature_len(&self) -> usize {
        NUMERIC_COLUMNS.len() + self.encoder.categories.len()
    }
}

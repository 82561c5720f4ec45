//! Tabular training data: raw-to-processed cleaning and loading.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::features::{RideInput, RouteType};

/// Name of the regression target column in training data.
pub const TARGET_COLUMN: &str = "avg_speed_kmph";

/// Errors from reading or writing training data.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("dataset CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("no usable rows in {path}")]
    Empty {
        /// Source file
        path: String,
    },
}

/// A raw CSV row; every field optional so incomplete rows can be dropped
/// instead of failing the whole load.
#[derive(Debug, Clone, Deserialize)]
struct RawRideRow {
    distance_km: Option<f64>,
    elevation_gain_m: Option<f64>,
    ride_time_min: Option<f64>,
    temperature_c: Option<f64>,
    route_type: Option<String>,
    avg_speed_kmph: Option<f64>,
}

/// A cleaned row, as written to the processed CSV.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProcessedRideRow {
    distance_km: f64,
    elevation_gain_m: f64,
    ride_time_min: f64,
    temperature_c: f64,
    route_type: RouteType,
    avg_speed_kmph: f64,
}

/// One complete training example.
#[derive(Debug, Clone)]
pub struct TrainingRow {
    /// Ride parameters (features are built from these at fit time)
    pub input: RideInput,
    /// Observed average speed in km/h (the regression target)
    pub target: f64,
}

impl RawRideRow {
    /// Convert to a processed row, or `None` when any value is missing.
    fn complete(self) -> Option<ProcessedRideRow> {
        Some(ProcessedRideRow {
            distance_km: self.distance_km?,
            elevation_gain_m: self.elevation_gain_m?,
            ride_time_min: self.ride_time_min?,
            temperature_c: self.temperature_c?,
            route_type: RouteType::from(self.route_type?),
            avg_speed_kmph: self.avg_speed_kmph?,
        })
    }
}

impl From<ProcessedRideRow> for TrainingRow {
    fn from(row: ProcessedRideRow) -> Self {
        Self {
            input: RideInput {
                distance_km: row.distance_km,
                elevation_gain_m: row.elevation_gain_m,
                ride_time_min: row.ride_time_min,
                temperature_c: row.temperature_c,
                route_type: row.route_type,
            },
            target: row.avg_speed_kmph,
        }
    }
}

/// Counts from a cleaning pass.
#[derive(Debug, Clone, Copy)]
pub struct CleanSummary {
    /// Rows written to the processed file
    pub kept: usize,
    /// Rows dropped for missing values
    pub dropped: usize,
}

/// Clean a raw CSV into the processed training file.
///
/// Drops rows with any missing value and normalizes the route-type strings;
/// creates the output file's parent directories.
pub fn clean_raw_data(input: &Path, output: &Path) -> Result<CleanSummary, DatasetError> {
    let mut reader = csv::Reader::from_path(input)?;

    let mut kept = Vec::new();
    let mut dropped = 0usize;
    for row in reader.deserialize::<RawRideRow>() {
        match row?.complete() {
            Some(processed) => kept.push(processed),
            None => dropped += 1,
        }
    }

    if kept.is_empty() {
        return Err(DatasetError::Empty {
            path: input.display().to_string(),
        });
    }

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::Writer::from_path(output)?;
    for row in &kept {
        writer.serialize(row)?;
    }
    writer.flush()?;

    info!(
        kept = kept.len(),
        dropped,
        output = %output.display(),
        "Wrote processed training data"
    );

    Ok(CleanSummary {
        kept: kept.len(),
        dropped,
    })
}

/// Load training rows from a processed CSV.
///
/// Incomplete rows are skipped with a warning so one bad line does not kill
/// an otherwise usable dataset.
pub fn load_training_rows(path: &Path) -> Result<Vec<TrainingRow>, DatasetError> {
    let mut reader = csv::Reader::from_path(path)?;

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for row in reader.deserialize::<RawRideRow>() {
        match row?.complete() {
            Some(processed) => rows.push(TrainingRow::from(processed)),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!(skipped, path = %path.display(), "Skipped incomplete training rows");
    }

    if rows.is_empty() {
        return Err(DatasetError::Empty {
            path: path.display().to_string(),
        });
    }

    Ok(rows)
}

//! Append-only ride history persisted as a CSV log.
//!
//! Records are appended after each successful evaluation; the file and its
//! header row are created on first write and prior entries are never
//! rewritten.

use std::fs::OpenOptions;
use std::path::Path;

use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::evaluation::RideEvaluation;
use crate::features::RouteType;
use crate::physics::RoundTo;

/// Errors from the history sink.
///
/// A persistence failure is reported but never invalidates an evaluation
/// that was already computed.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("history CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// One persisted evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RideRecord {
    /// When the evaluation was made
    pub recorded_at: DateTime<Utc>,
    /// Rider display name
    pub rider: String,
    pub distance_km: f64,
    pub elevation_gain_m: f64,
    pub ride_time_min: f64,
    pub temperature_c: f64,
    pub route_type: RouteType,
    /// Predicted average speed, rounded to 2 decimals
    pub speed_kmph: f64,
    /// Estimated power, rounded to 1 decimal
    pub power_w: f64,
    /// Estimated calories, rounded to 1 decimal
    pub calories_kcal: f64,
}

impl RideRecord {
    /// Build a record from an evaluation, applying the fixed persistence
    /// rounding (speed 2 decimals; power and calories 1 decimal).
    pub fn from_evaluation(
        rider: &str,
        evaluation: &RideEvaluation,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            recorded_at,
            rider: rider.to_string(),
            distance_km: evaluation.input.distance_km,
            elevation_gain_m: evaluation.input.elevation_gain_m,
            ride_time_min: evaluation.input.ride_time_min,
            temperature_c: evaluation.input.temperature_c,
            route_type: evaluation.input.route_type.clone(),
            speed_kmph: evaluation.speed_kmph.round_to(2),
            power_w: evaluation.physics.power_w.round_to(1),
            calories_kcal: evaluation.physics.energy_kcal.round_to(1),
        }
    }
}

/// Append a record to the history log at `path`.
///
/// Creates parent directories and writes the header row only when the file
/// does not exist yet.
pub fn append_record(path: &Path, record: &RideRecord) -> Result<(), HistoryError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file_exists = path.exists();
    debug!(path = %path.display(), file_exists, "Appending ride record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(record)?;
    writer.flush()?;

    Ok(())
}

/// Read the full history log. An absent file reads as an empty history.
pub fn read_history(path: &Path) -> Result<Vec<RideRecord>, HistoryError> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for row in reader.deserialize() {
        records.push(row?);
    }
    Ok(records)
}

//! Derived-column construction for ride records.

use crate::features::types::FeatureRecord;

/// Floor for the distance denominator when computing elevation per km.
///
/// Guards against division blow-up for very short rides; the record's real
/// `distance_km` is left untouched.
pub const MIN_DISTANCE_KM: f64 = 0.1;

/// Floor for ride time (minutes) when computing the implied average speed.
pub const MIN_RIDE_TIME_MIN: f64 = 1e-3;

/// Add the derived feature columns to a record.
///
/// Each derived field is only filled when absent, so applying the builder to
/// an already-extended record returns it unchanged (idempotent).
pub fn build_features(mut record: FeatureRecord) -> FeatureRecord {
    if record.elevation_per_km.is_none() {
        let denom = record.distance_km.max(MIN_DISTANCE_KM);
        record.elevation_per_km = Some(record.elevation_gain_m / denom);
    }

    if record.computed_speed_kmph.is_none() {
        let hours = record.ride_time_min.max(MIN_RIDE_TIME_MIN) / 60.0;
        record.computed_speed_kmph = Some(record.distance_km / hours);
    }

    record
}

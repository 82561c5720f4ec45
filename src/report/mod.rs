//! Plain-text performance report rendering.
//!
//! Consumes the serializable evaluation bundle; completely decoupled from
//! the evaluation core.

use std::path::Path;

use chrono::{DateTime, Utc};

use crate::evaluation::RideEvaluation;
use crate::physics::RoundTo;

/// Render a performance report for one evaluation.
pub fn render_report(rider: &str, evaluation: &RideEvaluation, at: DateTime<Utc>) -> String {
    let input = &evaluation.input;

    format!(
        "Cycling Performance Report\n\
         ==========================\n\
         \n\
         Rider:          {rider}\n\
         Date:           {date}\n\
         \n\
         Distance:       {distance:.1} km\n\
         Elevation gain: {elevation:.0} m\n\
         Ride time:      {time:.0} min\n\
         Temperature:    {temperature:.1} C\n\
         Route type:     {route}\n\
         \n\
         Predicted speed: {speed:.2} km/h\n\
         Power:           {power:.0} W\n\
         Calories:        {calories:.0} kcal\n",
        date = at.format("%d-%m-%Y %H:%M"),
        distance = input.distance_km,
        elevation = input.elevation_gain_m,
        time = input.ride_time_min,
        temperature = input.temperature_c,
        route = input.route_type,
        speed = evaluation.speed_kmph.round_to(2),
        power = evaluation.physics.power_w.round_to(0),
        calories = evaluation.physics.energy_kcal.round_to(0),
    )
}

/// Render and write a report file.
pub fn write_report(
    path: &Path,
    rider: &str,
    evaluation: &RideEvaluation,
    at: DateTime<Utc>,
) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, render_report(rider, evaluation, at))
}

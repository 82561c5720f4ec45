//! CyclePredict - Cycling Performance Prediction
//!
//! CLI entry point: evaluate planned rides against the trained model, train
//! the model from ride data, clean raw data, and inspect the ride history.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cyclepredict::config::load_config;
use cyclepredict::history::{append_record, read_history, RideRecord};
use cyclepredict::report::write_report;
use cyclepredict::training::{clean_raw_data, train_from_csv, TrainConfig};
use cyclepredict::{RideEvaluator, RideInput, RiderProfile, RouteType};

#[derive(Parser)]
#[command(name = "cyclepredict")]
#[command(about = "Predict cycling speed, power, and calories for a planned ride", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a planned ride and append it to the ride history
    Predict {
        /// Rider name
        #[arg(long)]
        rider: String,

        /// Distance in km
        #[arg(long, default_value_t = 30.0)]
        distance_km: f64,

        /// Elevation gain in meters
        #[arg(long, default_value_t = 200.0)]
        elevation_gain_m: f64,

        /// Planned ride time in minutes
        #[arg(long, default_value_t = 90.0)]
        ride_time_min: f64,

        /// Expected temperature in Celsius
        #[arg(long, default_value_t = 28.0)]
        temperature_c: f64,

        /// Route type (flat, rolling, climb)
        #[arg(long, default_value = "flat")]
        route_type: String,

        /// Rider weight in kg
        #[arg(long, default_value_t = 70.0)]
        rider_weight_kg: f64,

        /// Bike weight in kg
        #[arg(long, default_value_t = 8.0)]
        bike_weight_kg: f64,

        /// Model artifact path (defaults to the configured location)
        #[arg(long)]
        model: Option<PathBuf>,

        /// Write a plain-text report to this path
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Train the speed model from a processed ride CSV
    Train {
        /// Processed training data CSV
        #[arg(long)]
        data: Option<PathBuf>,

        /// Output path for the model artifact
        #[arg(long)]
        model: Option<PathBuf>,
    },
    /// Clean a raw ride CSV into the processed training file
    PrepareData {
        /// Raw input CSV
        #[arg(long)]
        raw: Option<PathBuf>,

        /// Processed output CSV
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print recorded ride history
    History {
        /// History CSV path (defaults to the configured location)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = load_config().context("failed to load configuration")?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Predict {
            rider,
            distance_km,
            elevation_gain_m,
            ride_time_min,
            temperature_c,
            route_type,
            rider_weight_kg,
            bike_weight_kg,
            model,
            report,
        } => {
            let input = RideInput {
                distance_km,
                elevation_gain_m,
                ride_time_min,
                temperature_c,
                route_type: RouteType::from(route_type),
            };
            let profile = RiderProfile {
                name: rider,
                rider_weight_kg,
                bike_weight_kg,
            };

            let model_path = model.unwrap_or_else(|| config.model_path.clone());
            let evaluator = RideEvaluator::with_model_path(model_path);
            let evaluation = evaluator.evaluate(&input, &profile)?;

            println!("Prediction for {}", profile.name);
            println!("  Speed:    {:.2} km/h", evaluation.speed_kmph);
            println!("  Power:    {:.0} W", evaluation.physics.power_w);
            println!("  Calories: {:.0} kcal", evaluation.physics.energy_kcal);

            let now = Utc::now();
            let record = RideRecord::from_evaluation(&profile.name, &evaluation, now);

            // A persistence failure must not invalidate the prediction that
            // was already computed and printed.
            if let Err(e) = append_record(&config.history_path, &record) {
                error!(path = %config.history_path.display(), "Failed to save ride history: {e}");
            } else {
                info!(path = %config.history_path.display(), "Ride saved to history");
            }

            if let Some(report_path) = report {
                write_report(&report_path, &profile.name, &evaluation, now)
                    .with_context(|| format!("failed to write report to {}", report_path.display()))?;
                println!("Report written to {}", report_path.display());
            }
        }
        Commands::Train { data, model } => {
            let data_path = data.unwrap_or_else(|| config.processed_data_path.clone());
            let model_path = model.unwrap_or_else(|| config.model_path.clone());

            let report = train_from_csv(&data_path, &model_path, &TrainConfig::default())?;

            println!(
                "Trained on {} rows ({} train / {} holdout)",
                report.rows_total, report.rows_train, report.rows_test
            );
            if let Some(mae) = report.holdout_mae {
                println!("Holdout MAE: {mae:.2} km/h");
            }
            println!("Model saved to {}", model_path.display());
        }
        Commands::PrepareData { raw, output } => {
            let raw_path = raw.unwrap_or_else(|| config.raw_data_path.clone());
            let output_path = output.unwrap_or_else(|| config.processed_data_path.clone());

            let summary = clean_raw_data(&raw_path, &output_path)?;
            println!(
                "Processed {} rows ({} dropped) into {}",
                summary.kept,
                summary.dropped,
                output_path.display()
            );
        }
        Commands::History { path } => {
            let history_path = path.unwrap_or_else(|| config.history_path.clone());
            let records = read_history(&history_path)?;

            if records.is_empty() {
                println!("No rides recorded yet");
            }
            for r in records {
                println!(
                    "{}  {:<12} {:>6.1} km  {:>6.2} km/h  {:>6.1} W  {:>7.1} kcal",
                    r.recorded_at.format("%Y-%m-%d %H:%M"),
                    r.rider,
                    r.distance_km,
                    r.speed_kmph,
                    r.power_w,
                    r.calories_kcal
                );
            }
        }
    }

    Ok(())
}

//! End-to-end pipeline test: clean raw data, train a model, evaluate rides,
//! and persist the history.

use chrono::Utc;
use std::path::Path;

use cyclepredict::history::{append_record, read_history, RideRecord};
use cyclepredict::model::{ForestConfig, PredictError};
use cyclepredict::report::render_report;
use cyclepredict::training::{clean_raw_data, train_from_csv, TrainConfig};
use cyclepredict::evaluation::EvalError;
use cyclepredict::{RideEvaluator, RideInput, RiderProfile, RouteType};

fn write_raw_csv(path: &Path) {
    let mut writer = csv::Writer::from_path(path).unwrap();
    writer
        .write_record([
            "distance_km",
            "elevation_gain_m",
            "ride_time_min",
            "temperature_c",
            "route_type",
            "avg_speed_kmph",
        ])
        .unwrap();

    for i in 0..80u32 {
        // A mostly deterministic speed rule with route and elevation effects,
        // plus one row with a missing value to exercise the cleaning step.
        if i == 40 {
            writer
                .write_record(["25.0", "", "70.0", "20.0", "flat", "25.0"])
                .unwrap();
            continue;
        }

        let distance = 20.0 + (i % 6) as f64 * 10.0;
        let elevation = (i % 4) as f64 * 300.0;
        let route = match i % 3 {
            0 => "flat",
            1 => "rolling",
            _ => "climb",
        };
        let base: f64 = match route {
            "flat" => 28.0,
            "rolling" => 24.0,
            _ => 19.0,
        };
        let speed = base - elevation / 250.0;
        let time_min = distance / speed * 60.0;

        writer
            .write_record([
                distance.to_string(),
                elevation.to_string(),
                time_min.to_string(),
                (15.0 + (i % 12) as f64).to_string(),
                route.to_string(),
                speed.to_string(),
            ])
            .unwrap();
    }
    writer.flush().unwrap();
}

fn quick_train_config() -> TrainConfig {
    TrainConfig {
        forest: ForestConfig {
            n_trees: 40,
            max_depth: 8,
            min_samples_leaf: 1,
            seed: 42,
        },
        test_fraction: 0.2,
    }
}

#[test]
fn test_full_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let raw = dir.path().join("raw.csv");
    let processed = dir.path().join("processed.csv");
    let model = dir.path().join("models").join("model.json");
    let history = dir.path().join("history.csv");

    write_raw_csv(&raw);

    let summary = clean_raw_data(&raw, &processed).unwrap();
    assert_eq!(summary.kept, 79);
    assert_eq!(summary.dropped, 1);

    let report = train_from_csv(&processed, &model, &quick_train_config()).unwrap();
    assert!(model.exists());
    assert!(report.holdout_mae.unwrap() < 3.0);

    let evaluator = RideEvaluator::with_model_path(&model);
    let profile = RiderProfile {
        name: "Mohsin".to_string(),
        rider_weight_kg: 70.0,
        bike_weight_kg: 8.0,
    };
    let input = RideInput {
        distance_km: 30.0,
        elevation_gain_m: 200.0,
        ride_time_min: 90.0,
        temperature_c: 28.0,
        route_type: RouteType::Flat,
    };

    let evaluation = evaluator.evaluate(&input, &profile).unwrap();
    assert!(evaluation.speed_kmph > 10.0 && evaluation.speed_kmph < 40.0);
    assert!(evaluation.physics.power_w > 0.0);
    assert!(evaluation.physics.energy_kcal > 0.0);
    assert!((evaluation.physics.grade - 200.0 / 30_000.0).abs() < 1e-12);

    // Climbs should come out slower than the flat reference.
    let climb = RideInput {
        elevation_gain_m: 900.0,
        route_type: RouteType::Climb,
        ..input.clone()
    };
    let climb_eval = evaluator.evaluate(&climb, &profile).unwrap();
    assert!(climb_eval.speed_kmph < evaluation.speed_kmph);

    // Persist both evaluations and read them back.
    let now = Utc::now();
    append_record(&history, &RideRecord::from_evaluation("Mohsin", &evaluation, now)).unwrap();
    append_record(&history, &RideRecord::from_evaluation("Mohsin", &climb_eval, now)).unwrap();

    let records = read_history(&history).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].rider, "Mohsin");

    // Report renders from the same bundle.
    let rendered = render_report("Mohsin", &evaluation, now);
    assert!(rendered.contains("Mohsin"));
    assert!(rendered.contains("km/h"));
}

#[test]
fn test_unknown_route_type_still_predicts() {
    let dir = tempfile::tempdir().unwrap();
    let raw = dir.path().join("raw.csv");
    let processed = dir.path().join("processed.csv");
    let model = dir.path().join("model.json");

    write_raw_csv(&raw);
    clean_raw_data(&raw, &processed).unwrap();
    train_from_csv(&processed, &model, &quick_train_config()).unwrap();

    let evaluator = RideEvaluator::with_model_path(&model);
    let input = RideInput {
        distance_km: 35.0,
        elevation_gain_m: 150.0,
        ride_time_min: 100.0,
        temperature_c: 22.0,
        route_type: RouteType::Other("gravel".to_string()),
    };
    let profile = RiderProfile {
        name: "test".to_string(),
        rider_weight_kg: 75.0,
        bike_weight_kg: 10.0,
    };

    // Unseen category encodes as all zeros; prediction must still succeed.
    let evaluation = evaluator.evaluate(&input, &profile).unwrap();
    assert!(evaluation.speed_kmph.is_finite());
}

#[test]
fn test_missing_model_is_reported_not_masked() {
    let dir = tempfile::tempdir().unwrap();
    let evaluator = RideEvaluator::with_model_path(dir.path().join("absent.json"));

    let input = RideInput {
        distance_km: 30.0,
        elevation_gain_m: 200.0,
        ride_time_min: 90.0,
        temperature_c: 28.0,
        route_type: RouteType::Flat,
    };
    let profile = RiderProfile {
        name: "test".to_string(),
        rider_weight_kg: 70.0,
        bike_weight_kg: 8.0,
    };

    let err = evaluator.evaluate(&input, &profile).unwrap_err();
    assert!(matches!(
        err,
        EvalError::Predict(PredictError::ModelNotFound { .. })
    ));
}

//! Integration test modules.

mod prediction_pipeline_test;

//! Production model generator.
//!
//! Loads the training data, fits the full pipeline (imputers, encoding,
//! scaling, SMOTE, logistic regression), calibrates the decision threshold
//! on the held-out set and exports every artifact for the API. Any failure
//! aborts the run before a single artifact is written.

use std::env;
use std::path::PathBuf;

use anyhow::Context;
use log::info;

use aerorisk_core::dataset;
use aerorisk_core::training;

/// Paths, overridable via environment (defaults match the source datasets).
struct TrainConfig {
    train_csv: PathBuf,
    test_csv: PathBuf,
    artifacts_dir: PathBuf,
}

impl TrainConfig {
    fn from_env() -> Self {
        let path = |key: &str, default: &str| {
            PathBuf::from(env::var(key).unwrap_or_else(|_| default.to_string()))
        };
        Self {
            train_csv: path("TRAIN_CSV", "docs/treino.csv"),
            test_csv: path("TEST_CSV", "docs/teste.csv"),
            artifacts_dir: path("ARTIFACTS_DIR", "artifacts"),
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = TrainConfig::from_env();
    info!("AeroRisk model generator starting");

    let training_set = dataset::load_csv(&config.train_csv)
        .with_context(|| format!("loading {}", config.train_csv.display()))?;
    let holdout_set = dataset::load_csv(&config.test_csv)
        .with_context(|| format!("loading {}", config.test_csv.display()))?;

    let (bundle, report) = training::train(&training_set, &holdout_set)?;

    info!("training rows: {} ({} fatal)", report.training_rows, report.fatal_rows);
    info!("encoded features: {}", report.n_features);
    info!("rows after rebalancing: {}", report.balanced_rows);
    info!("calibrated threshold: {:.4}", report.threshold);
    info!(
        "held-out metrics ({} rows): F1={:.4} precision={:.4} recall={:.4} AUC={:.4}",
        report.holdout_rows, report.f1, report.precision, report.recall, report.auc
    );
    info!(
        "confusion matrix: TP={} FP={} TN={} FN={}",
        report.confusion.true_positives,
        report.confusion.false_positives,
        report.confusion.true_negatives,
        report.confusion.false_negatives
    );

    bundle
        .save(&config.artifacts_dir)
        .with_context(|| format!("writing artifacts to {}", config.artifacts_dir.display()))?;
    info!("artifacts written to {}", config.artifacts_dir.display());

    Ok(())
}

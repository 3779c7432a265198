//! The offline training job - one shot, fail fast.
//!
//! Fits the whole chain (preprocessing -> rebalancing -> classifier ->
//! threshold calibration) and produces an in-memory [`ModelBundle`] plus a
//! validation report. Nothing is persisted here; the caller saves the
//! bundle only after this function has returned Ok, so a failed run never
//! leaves a partial artifact set behind.

use log::info;
use ndarray::Array2;

use crate::artifacts::ModelBundle;
use crate::balance::Smote;
use crate::dataset::Dataset;
use crate::error::PipelineError;
use crate::metrics::{roc_auc, ConfusionMatrix};
use crate::model::LogisticModel;
use crate::pipeline::Preprocessor;
use crate::threshold::CalibratedThreshold;

/// Held-out validation metrics at the calibrated threshold.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub training_rows: usize,
    pub fatal_rows: usize,
    pub n_features: usize,
    pub balanced_rows: usize,
    pub holdout_rows: usize,
    pub threshold: f64,
    pub f1: f64,
    pub precision: f64,
    pub recall: f64,
    pub auc: f64,
    pub confusion: ConfusionMatrix,
}

/// Fit everything on `training`, calibrate and validate on `holdout`.
pub fn train(training: &Dataset, holdout: &Dataset) -> Result<(ModelBundle, TrainingReport), PipelineError> {
    let records = training.records();
    let labels: Vec<i32> = training.rows.iter().map(|r| i32::from(r.fatal)).collect();
    let fatal_rows = labels.iter().filter(|&&l| l == 1).count();
    info!(
        "training on {} rows ({} fatal, {} non-fatal)",
        records.len(),
        fatal_rows,
        records.len() - fatal_rows
    );

    let (preprocessor, matrix) = Preprocessor::fit(&records)?;
    let n_features = preprocessor.n_features();
    info!("encoded feature count: {}", n_features);

    let n_rows = matrix.len();
    let flat: Vec<f64> = matrix.into_iter().flatten().collect();
    let x = Array2::from_shape_vec((n_rows, n_features), flat)
        .map_err(|e| PipelineError::Training(e.to_string()))?;

    let (x_balanced, y_balanced) = Smote::default().resample(&x, &labels);
    let model = LogisticModel::train(&x_balanced, &y_balanced)?;

    // Threshold calibration runs on held-out data through the transform-only
    // path - the same path the serving process replays.
    let mut probabilities = Vec::with_capacity(holdout.rows.len());
    let mut holdout_labels = Vec::with_capacity(holdout.rows.len());
    for row in &holdout.rows {
        let vector = preprocessor.apply(&row.record)?;
        probabilities.push(model.predict_proba(&vector));
        holdout_labels.push(row.fatal);
    }

    let threshold = CalibratedThreshold::calibrate(&probabilities, &holdout_labels);
    let confusion =
        ConfusionMatrix::from_probabilities(&probabilities, &holdout_labels, threshold.threshold);
    let report = TrainingReport {
        training_rows: n_rows,
        fatal_rows,
        n_features,
        balanced_rows: y_balanced.len(),
        holdout_rows: holdout.rows.len(),
        threshold: threshold.threshold,
        f1: confusion.f1(),
        precision: confusion.precision(),
        recall: confusion.recall(),
        auc: roc_auc(&probabilities, &holdout_labels),
        confusion,
    };

    let bundle = ModelBundle { preprocessor, model, threshold };
    Ok((bundle, report))
}

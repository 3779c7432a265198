//! Fatality classifier - L2-regularized logistic regression.
//!
//! Fitting goes through linfa; the persisted artifact is the raw weight
//! vector and intercept, and inference is a plain sigmoid of the dot
//! product, so a loaded model is deterministic and carries no solver state.

use linfa::prelude::*;
use linfa_logistic::LogisticRegression;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Regularization strength, the reference model's C = 1.0.
pub const DEFAULT_ALPHA: f64 = 1.0;

/// Solver iteration cap, matching the reference model.
pub const DEFAULT_MAX_ITERATIONS: u64 = 1000;

/// Fitted logistic model: fatality probability is
/// `sigmoid(weights . x + intercept)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    pub weights: Vec<f64>,
    pub intercept: f64,
}

impl LogisticModel {
    /// Fit on the rebalanced, scaled, encoded training matrix.
    pub fn train(x: &Array2<f64>, y: &[i32]) -> Result<Self, PipelineError> {
        let targets = Array1::from(y.to_vec());
        let dataset = Dataset::new(x.clone(), targets);

        let fitted = LogisticRegression::default()
            .alpha(DEFAULT_ALPHA)
            .max_iterations(DEFAULT_MAX_ITERATIONS)
            .fit(&dataset)
            .map_err(|e| PipelineError::Training(e.to_string()))?;

        let mut model = Self {
            weights: fitted.params().to_vec(),
            intercept: fitted.intercept(),
        };
        model.orient_positive(x, y);
        Ok(model)
    }

    /// Probability of the positive (fatal) class for one feature vector.
    pub fn predict_proba(&self, features: &[f64]) -> f64 {
        let z = self.intercept
            + self
                .weights
                .iter()
                .zip(features)
                .map(|(w, x)| w * x)
                .sum::<f64>();
        sigmoid(z)
    }

    pub fn n_features(&self) -> usize {
        self.weights.len()
    }

    /// Normalize the sign convention so the stored weights always score
    /// label 1. The solver's internal class mapping is not part of its
    /// stable API; orientation is checked against the training labels and
    /// flipped if inverted.
    fn orient_positive(&mut self, x: &Array2<f64>, y: &[i32]) {
        let mut positive_sum = 0.0;
        let mut positive_n = 0usize;
        let mut negative_sum = 0.0;
        let mut negative_n = 0usize;

        for (row, &label) in x.rows().into_iter().zip(y) {
            let p = self.predict_proba(row.as_slice().unwrap_or(&[]));
            if label == 1 {
                positive_sum += p;
                positive_n += 1;
            } else {
                negative_sum += p;
                negative_n += 1;
            }
        }

        if positive_n == 0 || negative_n == 0 {
            return;
        }

        if positive_sum / positive_n as f64 < negative_sum / negative_n as f64 {
            for w in &mut self.weights {
                *w = -*w;
            }
            self.intercept = -self.intercept;
        }
    }
}

/// Numerically-stable sigmoid.
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

//! Standard scaler - per-column zero mean, unit variance.
//!
//! Statistics are fit once over the encoded training matrix (population
//! standard deviation, ddof = 0) and applied verbatim afterwards. A column
//! whose training standard deviation is zero was constant and carries no
//! signal: its scaled output is defined as exactly 0.0.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
}

impl StandardScaler {
    /// Fit per-column statistics over a row-major matrix.
    pub fn fit(rows: &[Vec<f64>]) -> Self {
        let n_cols = rows.first().map_or(0, |r| r.len());
        let n = rows.len() as f64;

        let mut mean = vec![0.0; n_cols];
        for row in rows {
            for (m, v) in mean.iter_mut().zip(row) {
                *m += v;
            }
        }
        for m in &mut mean {
            *m /= n;
        }

        let mut std = vec![0.0; n_cols];
        for row in rows {
            for ((s, v), m) in std.iter_mut().zip(row).zip(&mean) {
                *s += (v - m) * (v - m);
            }
        }
        for s in &mut std {
            *s = (*s / n).sqrt();
        }

        Self { mean, std }
    }

    /// Scale one encoded vector in place.
    pub fn transform(&self, vector: &mut [f64]) {
        for ((v, m), s) in vector.iter_mut().zip(&self.mean).zip(&self.std) {
            *v = if *s == 0.0 { 0.0 } else { (*v - m) / s };
        }
    }

    pub fn len(&self) -> usize {
        self.mean.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mean.is_empty()
    }
}

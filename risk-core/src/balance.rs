//! Class rebalancing - synthetic minority oversampling (SMOTE).
//!
//! Runs exactly once, on the fitting path, over the scaled encoded training
//! matrix. Serving data is never rebalanced. The generator is seeded, so a
//! training run is reproducible end to end.

use log::{info, warn};
use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Default neighbor count, matching the reference oversampler.
pub const DEFAULT_K_NEIGHBORS: usize = 5;

/// Seed fixed for reproducible training runs.
pub const DEFAULT_SEED: u64 = 42;

#[derive(Debug, Clone)]
pub struct Smote {
    pub k_neighbors: usize,
    pub seed: u64,
}

impl Default for Smote {
    fn default() -> Self {
        Self { k_neighbors: DEFAULT_K_NEIGHBORS, seed: DEFAULT_SEED }
    }
}

impl Smote {
    /// Oversample the minority class to a 1:1 ratio.
    ///
    /// Each synthetic row is `base + gap * (neighbor - base)` with `base` a
    /// random minority row, `neighbor` one of its k nearest minority
    /// neighbors and `gap` uniform in [0, 1). With fewer than two minority
    /// rows there is nothing to interpolate; the input is returned as-is.
    pub fn resample(&self, x: &Array2<f64>, y: &[i32]) -> (Array2<f64>, Vec<i32>) {
        let positives = y.iter().filter(|&&l| l == 1).count();
        let negatives = y.len() - positives;

        let (minority_label, deficit): (i32, usize) = if positives < negatives {
            (1, negatives - positives)
        } else {
            (0, positives - negatives)
        };

        if deficit == 0 {
            return (x.clone(), y.to_vec());
        }

        let minority_rows: Vec<usize> = y
            .iter()
            .enumerate()
            .filter(|(_, &l)| l == minority_label)
            .map(|(i, _)| i)
            .collect();

        if minority_rows.len() < 2 {
            warn!(
                "SMOTE skipped: only {} minority sample(s), classes left imbalanced",
                minority_rows.len()
            );
            return (x.clone(), y.to_vec());
        }

        let k = self.k_neighbors.min(minority_rows.len() - 1);
        let neighbors = nearest_neighbors(x, &minority_rows, k);

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut synthetic = Vec::with_capacity(deficit);
        for _ in 0..deficit {
            let base_pos = rng.gen_range(0..minority_rows.len());
            let neighbor_pos = neighbors[base_pos][rng.gen_range(0..k)];
            let gap: f64 = rng.gen();

            let base = x.row(minority_rows[base_pos]).to_owned();
            let neighbor = x.row(neighbor_pos).to_owned();
            let row: Array1<f64> = &base + &((neighbor - &base) * gap);
            synthetic.push(row);
        }

        let mut balanced = x.clone();
        let mut labels = y.to_vec();
        for row in &synthetic {
            balanced.push_row(row.view()).expect("synthetic row width mismatch");
            labels.push(minority_label);
        }

        info!(
            "SMOTE: {} synthetic minority samples added ({} per class)",
            deficit,
            labels.iter().filter(|&&l| l == 1).count()
        );

        (balanced, labels)
    }
}

/// For each minority row, the indices (into the full matrix) of its k
/// nearest minority neighbors, self excluded, by Euclidean distance.
fn nearest_neighbors(x: &Array2<f64>, minority_rows: &[usize], k: usize) -> Vec<Vec<usize>> {
    minority_rows
        .iter()
        .map(|&i| {
            let mut distances: Vec<(usize, f64)> = minority_rows
                .iter()
                .filter(|&&j| j != i)
                .map(|&j| {
                    let diff = &x.index_axis(Axis(0), i).to_owned() - &x.index_axis(Axis(0), j);
                    (j, diff.dot(&diff))
                })
                .collect();
            distances.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap().then(a.0.cmp(&b.0)));
            distances.into_iter().take(k).map(|(j, _)| j).collect()
        })
        .collect()
}

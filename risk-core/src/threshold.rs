//! Decision threshold - calibration and the persisted artifact.
//!
//! The cutoff is chosen once, after training, by sweeping candidates on a
//! held-out set and keeping the F1-maximizing value (ties break to the
//! lowest cutoff). It is persisted together with the F1 it achieved and
//! never recomputed at serving time.

use std::fmt::Write as _;
use std::path::Path;

use crate::error::ArtifactError;
use crate::metrics::ConfusionMatrix;

/// File keys, kept byte-compatible with the original artifact.
const THRESHOLD_KEY: &str = "THRESHOLD_OTIMIZADO";
const F1_KEY: &str = "F1-SCORE";

/// Calibrated decision threshold and the held-out F1 it achieved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibratedThreshold {
    pub threshold: f64,
    pub f1: f64,
}

impl CalibratedThreshold {
    /// Sweep cutoffs 0.01..=0.99 in steps of 0.01 over held-out
    /// probabilities and pick the F1 maximizer, lowest cutoff on ties.
    pub fn calibrate(probabilities: &[f64], labels: &[bool]) -> Self {
        let mut best = Self { threshold: 0.01, f1: -1.0 };
        for step in 1..=99u32 {
            let threshold = f64::from(step) / 100.0;
            let f1 = ConfusionMatrix::from_probabilities(probabilities, labels, threshold).f1();
            if f1 > best.f1 {
                best = Self { threshold, f1 };
            }
        }
        Self { threshold: best.threshold, f1: best.f1.max(0.0) }
    }

    /// Render the two-line `key = value` text artifact.
    pub fn to_file_contents(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{} = {:.4}", THRESHOLD_KEY, self.threshold);
        let _ = writeln!(out, "{} = {:.4}", F1_KEY, self.f1);
        out
    }

    /// Parse the text artifact.
    pub fn from_file_contents(name: &str, contents: &str) -> Result<Self, ArtifactError> {
        let mut threshold = None;
        let mut f1 = None;
        for line in contents.lines() {
            let Some((key, value)) = line.split_once('=') else { continue };
            let parsed = value
                .trim()
                .parse::<f64>()
                .map_err(|e| ArtifactError::corrupt(name, format!("bad value: {}", e)))?;
            match key.trim() {
                THRESHOLD_KEY => threshold = Some(parsed),
                F1_KEY => f1 = Some(parsed),
                _ => {}
            }
        }
        let threshold = threshold
            .ok_or_else(|| ArtifactError::corrupt(name, format!("missing {}", THRESHOLD_KEY)))?;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ArtifactError::corrupt(
                name,
                format!("threshold {} outside [0, 1]", threshold),
            ));
        }
        let f1 = f1.ok_or_else(|| ArtifactError::corrupt(name, format!("missing {}", F1_KEY)))?;
        Ok(Self { threshold, f1 })
    }

    pub fn save(&self, path: &Path) -> Result<(), ArtifactError> {
        let name = file_name(path);
        std::fs::write(path, self.to_file_contents()).map_err(|e| ArtifactError::io(&name, e))
    }

    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let name = file_name(path);
        let contents = std::fs::read_to_string(path).map_err(|e| ArtifactError::io(&name, e))?;
        Self::from_file_contents(&name, &contents)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name().and_then(|n| n.to_str()).unwrap_or("threshold").to_string()
}

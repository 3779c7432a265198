//! Serving pipeline - replays the fitted chain over new records.
//!
//! A [`Scorer`] borrows an immutable [`ModelBundle`] and scores records one
//! at a time: impute -> encode against the persisted schema -> scale ->
//! sigmoid -> threshold (inclusive) -> risk tier. Batch scoring is a
//! sequential loop with aggregate counts on top.

use serde::{Deserialize, Serialize};

use crate::artifacts::ModelBundle;
use crate::error::PipelineError;
use crate::record::AccidentRecord;

// ============================================================================
// RISK TIERS
// ============================================================================

/// Discretization of the fatality probability into ordered bands.
/// Lower bounds are inclusive: 0.30 is MODERADO, 0.70 is CRITICO.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    #[serde(rename = "BAIXO")]
    Baixo,
    #[serde(rename = "MODERADO")]
    Moderado,
    #[serde(rename = "ALTO")]
    Alto,
    #[serde(rename = "CRÍTICO")]
    Critico,
}

impl RiskTier {
    pub const ALL: [RiskTier; 4] =
        [RiskTier::Baixo, RiskTier::Moderado, RiskTier::Alto, RiskTier::Critico];

    pub fn from_probability(p: f64) -> Self {
        if p < 0.30 {
            RiskTier::Baixo
        } else if p < 0.50 {
            RiskTier::Moderado
        } else if p < 0.70 {
            RiskTier::Alto
        } else {
            RiskTier::Critico
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Baixo => "BAIXO",
            RiskTier::Moderado => "MODERADO",
            RiskTier::Alto => "ALTO",
            RiskTier::Critico => "CRÍTICO",
        }
    }

    /// Operational recommendation shown to the caller.
    pub fn recommendation(&self) -> &'static str {
        match self {
            RiskTier::Baixo => "Risco baixo. Manter procedimentos padrão de segurança.",
            RiskTier::Moderado => {
                "Risco moderado. Cautela recomendada e revisão dos fatores operacionais."
            }
            RiskTier::Alto => {
                "Risco alto. Medidas preventivas recomendadas antes da operação."
            }
            RiskTier::Critico => {
                "Risco crítico. Ação imediata recomendada: revisar a operação por completo."
            }
        }
    }
}

// ============================================================================
// PREDICTION
// ============================================================================

/// Outcome of scoring a single record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Fatality probability, rounded to 4 decimals.
    pub probability: f64,
    /// Decision under the persisted threshold (inclusive `>=`).
    pub fatal: bool,
    /// Threshold the decision was taken against.
    pub threshold: f64,
    pub tier: RiskTier,
}

impl Prediction {
    pub fn label(&self) -> &'static str {
        if self.fatal {
            "FATAL"
        } else {
            "NÃO FATAL"
        }
    }

    pub fn interpretation(&self) -> String {
        let percent = self.probability * 100.0;
        if self.fatal {
            format!(
                "ATENÇÃO: Alto risco de fatalidade ({:.1}%). Medidas preventivas recomendadas.",
                percent
            )
        } else {
            format!("Probabilidade de fatalidade abaixo do limiar de decisão ({:.1}%).", percent)
        }
    }
}

// ============================================================================
// SCORER
// ============================================================================

/// Stateless scoring over an immutable bundle.
#[derive(Debug, Clone, Copy)]
pub struct Scorer<'a> {
    bundle: &'a ModelBundle,
}

impl<'a> Scorer<'a> {
    pub fn new(bundle: &'a ModelBundle) -> Self {
        Self { bundle }
    }

    /// Raw fatality probability for one record (no rounding).
    pub fn probability(&self, record: &AccidentRecord) -> Result<f64, PipelineError> {
        let vector = self.bundle.preprocessor.apply(record)?;
        Ok(self.bundle.model.predict_proba(&vector))
    }

    /// Full scored outcome for one record.
    pub fn score(&self, record: &AccidentRecord) -> Result<Prediction, PipelineError> {
        let threshold = self.bundle.threshold.threshold;
        let probability = round4(self.probability(record)?);
        Ok(Prediction {
            probability,
            fatal: probability >= threshold,
            threshold,
            tier: RiskTier::from_probability(probability),
        })
    }
}

/// Round to the 4 decimals reported on the wire. The decision and the tier
/// are taken on the rounded value so the response is self-consistent.
fn round4(p: f64) -> f64 {
    (p * 10_000.0).round() / 10_000.0
}

// ============================================================================
// BATCH AGGREGATES
// ============================================================================

/// Aggregates over one batch of scored records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub predicted_fatal: usize,
    pub predicted_non_fatal: usize,
    /// Percentage of records predicted fatal, 0 for an empty batch.
    pub fatality_rate: f64,
    /// Mean (rounded) probability, 0 for an empty batch.
    pub mean_probability: f64,
    /// Count per tier, in [`RiskTier::ALL`] order.
    pub tier_counts: [usize; 4],
}

impl BatchSummary {
    pub fn from_predictions(predictions: &[Prediction]) -> Self {
        let total = predictions.len();
        let predicted_fatal = predictions.iter().filter(|p| p.fatal).count();

        let mut tier_counts = [0usize; 4];
        for prediction in predictions {
            let slot = RiskTier::ALL
                .iter()
                .position(|t| *t == prediction.tier)
                .expect("tier is one of ALL");
            tier_counts[slot] += 1;
        }

        let (fatality_rate, mean_probability) = if total == 0 {
            (0.0, 0.0)
        } else {
            let sum: f64 = predictions.iter().map(|p| p.probability).sum();
            (predicted_fatal as f64 / total as f64 * 100.0, sum / total as f64)
        };

        Self {
            total,
            predicted_fatal,
            predicted_non_fatal: total - predicted_fatal,
            fatality_rate,
            mean_probability,
            tier_counts,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

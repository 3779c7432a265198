//! Preprocessing pipeline - the train/serve consistency core.
//!
//! One component owns the whole deterministic chain
//! (imputation -> one-hot encoding -> schema alignment -> scaling).
//! Training calls [`Preprocessor::fit`] exactly once; everything else -
//! held-out validation and the serving path alike - goes through
//! [`Preprocessor::apply`], so the two paths cannot drift.

pub mod encoder;
pub mod imputer;
pub mod scaler;

use crate::error::PipelineError;
use crate::record::AccidentRecord;
use crate::schema::TrainingColumns;

pub use imputer::{MedianImputer, ModeImputer};
pub use scaler::StandardScaler;

/// The fitted preprocessing chain. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct Preprocessor {
    pub median_imputer: MedianImputer,
    pub mode_imputer: ModeImputer,
    pub columns: TrainingColumns,
    pub scaler: StandardScaler,
}

impl Preprocessor {
    /// Fit the chain on feature-engineered training records and return it
    /// together with the scaled, encoded training matrix.
    pub fn fit(records: &[AccidentRecord]) -> Result<(Self, Vec<Vec<f64>>), PipelineError> {
        let median_imputer = MedianImputer::fit(records);
        let mode_imputer = ModeImputer::fit(records);

        let mut imputed: Vec<AccidentRecord> = records.to_vec();
        for record in &mut imputed {
            median_imputer.apply(record);
            mode_imputer.apply(record);
        }

        let columns = encoder::fit(&imputed);

        let mut matrix = Vec::with_capacity(imputed.len());
        for record in &imputed {
            matrix.push(encoder::encode(record, &columns)?);
        }

        let scaler = StandardScaler::fit(&matrix);
        for row in &mut matrix {
            scaler.transform(row);
        }

        let preprocessor = Self { median_imputer, mode_imputer, columns, scaler };
        Ok((preprocessor, matrix))
    }

    /// Replay the fitted chain on one record (transform only, never refits).
    pub fn apply(&self, record: &AccidentRecord) -> Result<Vec<f64>, PipelineError> {
        let mut record = record.clone();
        self.median_imputer.apply(&mut record);
        self.mode_imputer.apply(&mut record);

        let mut vector = encoder::encode(&record, &self.columns)?;
        self.scaler.transform(&mut vector);
        Ok(vector)
    }

    /// Encoded feature dimension.
    pub fn n_features(&self) -> usize {
        self.columns.len()
    }
}

//! AeroRisk Core - fatal accident classifier pipeline.
//!
//! Owns the train/serve consistency contract: the deterministic chain
//! (feature engineering -> imputation -> one-hot encoding -> column
//! alignment -> scaling) lives in one place and is replayed identically by
//! the training job and the serving process. Training produces an immutable
//! artifact set; serving loads it once and scores records against it.

pub mod artifacts;
pub mod balance;
pub mod dataset;
pub mod error;
pub mod features;
pub mod metrics;
pub mod model;
pub mod pipeline;
pub mod record;
pub mod schema;
pub mod scoring;
pub mod threshold;
pub mod training;

// Re-export the serving surface
pub use artifacts::ModelBundle;
pub use error::{ArtifactError, PipelineError};
pub use record::AccidentRecord;
pub use scoring::{BatchSummary, Prediction, RiskTier, Scorer};

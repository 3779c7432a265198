//! Artifact store - everything a serving process needs, persisted once per
//! training run and loaded read-only at startup.
//!
//! File names are kept from the original artifact set. All JSON artifacts
//! are written pretty-printed; the threshold keeps its two-line text format.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ArtifactError;
use crate::model::LogisticModel;
use crate::pipeline::{MedianImputer, ModeImputer, Preprocessor, StandardScaler};
use crate::schema::TrainingColumns;
use crate::threshold::CalibratedThreshold;

pub const MODEL_FILE: &str = "modelo_lr.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const MEDIAN_IMPUTER_FILE: &str = "imputer_mediana.json";
pub const MODE_IMPUTER_FILE: &str = "imputer_moda.json";
pub const COLUMNS_FILE: &str = "colunas_treino.json";
pub const THRESHOLD_FILE: &str = "threshold_otimizado.txt";

/// The immutable set of artifacts a serving process works from.
///
/// Constructed once (either by a training run or by loading from disk) and
/// passed by reference into the scoring component - there is no ambient
/// global to mutate.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelBundle {
    pub preprocessor: Preprocessor,
    pub model: LogisticModel,
    pub threshold: CalibratedThreshold,
}

impl ModelBundle {
    /// Persist every artifact into `dir` (created if absent).
    ///
    /// Callers run this only after the whole training pipeline has
    /// succeeded, so a partial artifact set never shadows a good one.
    pub fn save(&self, dir: &Path) -> Result<(), ArtifactError> {
        fs::create_dir_all(dir)
            .map_err(|e| ArtifactError::io(&dir.to_string_lossy(), e))?;

        write_json(&dir.join(MODEL_FILE), &self.model)?;
        write_json(&dir.join(SCALER_FILE), &self.preprocessor.scaler)?;
        write_json(&dir.join(MEDIAN_IMPUTER_FILE), &self.preprocessor.median_imputer)?;
        write_json(&dir.join(MODE_IMPUTER_FILE), &self.preprocessor.mode_imputer)?;
        write_json(&dir.join(COLUMNS_FILE), &self.preprocessor.columns)?;
        self.threshold.save(&dir.join(THRESHOLD_FILE))?;
        Ok(())
    }

    /// Load and validate the full artifact set.
    pub fn load(dir: &Path) -> Result<Self, ArtifactError> {
        let model: LogisticModel = read_json(&dir.join(MODEL_FILE))?;
        let scaler: StandardScaler = read_json(&dir.join(SCALER_FILE))?;
        let median_imputer: MedianImputer = read_json(&dir.join(MEDIAN_IMPUTER_FILE))?;
        let mode_imputer: ModeImputer = read_json(&dir.join(MODE_IMPUTER_FILE))?;
        let columns: TrainingColumns = read_json(&dir.join(COLUMNS_FILE))?;
        let threshold = CalibratedThreshold::load(&dir.join(THRESHOLD_FILE))?;

        let bundle = Self {
            preprocessor: Preprocessor { median_imputer, mode_imputer, columns, scaler },
            model,
            threshold,
        };
        bundle.validate()?;
        Ok(bundle)
    }

    /// The artifacts are order-sensitive as a set: weights, scaler
    /// statistics and the column schema must agree on the dimension.
    fn validate(&self) -> Result<(), ArtifactError> {
        let n_columns = self.preprocessor.columns.len();
        if n_columns == 0 {
            return Err(ArtifactError::Inconsistent("column schema is empty".to_string()));
        }
        if self.preprocessor.scaler.len() != n_columns {
            return Err(ArtifactError::Inconsistent(format!(
                "scaler has {} columns, schema has {}",
                self.preprocessor.scaler.len(),
                n_columns
            )));
        }
        if self.model.n_features() != n_columns {
            return Err(ArtifactError::Inconsistent(format!(
                "model has {} weights, schema has {} columns",
                self.model.n_features(),
                n_columns
            )));
        }
        Ok(())
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ArtifactError> {
    let name = artifact_name(path);
    let json = serde_json::to_vec_pretty(value)
        .map_err(|e| ArtifactError::corrupt(&name, e))?;
    fs::write(path, json).map_err(|e| ArtifactError::io(&name, e))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let name = artifact_name(path);
    let data = fs::read(path).map_err(|e| ArtifactError::io(&name, e))?;
    serde_json::from_slice(&data).map_err(|e| ArtifactError::corrupt(&name, e))
}

fn artifact_name(path: &Path) -> String {
    path.file_name().and_then(|n| n.to_str()).unwrap_or("artifact").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::AccidentRecord;
    use tempfile::tempdir;

    fn fitted_bundle() -> ModelBundle {
        let records = vec![
            AccidentRecord {
                latitude: Some(-23.5),
                longitude: Some(-46.6),
                peso_max_decolagem: Some(5700.0),
                numero_assentos: Some(9.0),
                ano_ocorrencia: Some(2020.0),
                mes_ocorrencia: Some(6.0),
                regiao: Some("SUDESTE".to_string()),
                uf: Some("SP".to_string()),
                ..Default::default()
            },
            AccidentRecord {
                latitude: Some(-30.0),
                longitude: Some(-51.2),
                peso_max_decolagem: Some(750.0),
                numero_assentos: Some(2.0),
                ano_ocorrencia: Some(2018.0),
                mes_ocorrencia: Some(11.0),
                regiao: Some("SUL".to_string()),
                uf: Some("RS".to_string()),
                ..Default::default()
            },
        ];
        let (preprocessor, _) = Preprocessor::fit(&records).unwrap();
        let n = preprocessor.n_features();
        ModelBundle {
            model: LogisticModel { weights: vec![0.1; n], intercept: -0.5 },
            threshold: CalibratedThreshold { threshold: 0.26, f1: 0.3673 },
            preprocessor,
        }
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempdir().unwrap();
        let bundle = fitted_bundle();
        bundle.save(dir.path()).unwrap();

        let loaded = ModelBundle::load(dir.path()).unwrap();
        assert_eq!(loaded, bundle);
    }

    #[test]
    fn test_missing_artifact_is_reported_by_name() {
        let dir = tempdir().unwrap();
        let bundle = fitted_bundle();
        bundle.save(dir.path()).unwrap();
        std::fs::remove_file(dir.path().join(SCALER_FILE)).unwrap();

        let err = ModelBundle::load(dir.path()).unwrap_err();
        match err {
            ArtifactError::Missing(name) => assert_eq!(name, SCALER_FILE),
            other => panic!("expected Missing, got {:?}", other),
        }
    }

    #[test]
    fn test_dimension_mismatch_is_rejected() {
        let dir = tempdir().unwrap();
        let mut bundle = fitted_bundle();
        bundle.save(dir.path()).unwrap();

        // Corrupt the weight vector length and overwrite the model file.
        bundle.model.weights.push(0.0);
        let json = serde_json::to_vec_pretty(&bundle.model).unwrap();
        std::fs::write(dir.path().join(MODEL_FILE), json).unwrap();

        let err = ModelBundle::load(dir.path()).unwrap_err();
        assert!(matches!(err, ArtifactError::Inconsistent(_)));
    }

    #[test]
    fn test_corrupt_json_is_rejected() {
        let dir = tempdir().unwrap();
        fitted_bundle().save(dir.path()).unwrap();
        std::fs::write(dir.path().join(COLUMNS_FILE), b"not json").unwrap();

        let err = ModelBundle::load(dir.path()).unwrap_err();
        assert!(matches!(err, ArtifactError::Corrupt { .. }));
    }
}

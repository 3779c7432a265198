//! Column Layout - Centralized Feature Definition
//!
//! **CRITICAL: this file controls the pre-encoding column layout**
//!
//! The scaler and the classifier operate on a flat vector, not on named
//! columns. Every encoded vector MUST therefore follow the order defined
//! here: numeric columns first (in `NUMERIC_COLUMNS` order), then one
//! indicator block per categorical column (in `CATEGORICAL_COLUMNS` order).

use serde::{Deserialize, Serialize};

// ============================================================================
// RAW COLUMNS
// ============================================================================

/// Numeric feature columns, in the order they appear in the encoded vector.
pub const NUMERIC_COLUMNS: &[&str] = &[
    "latitude",
    "longitude",
    "peso_max_decolagem",
    "numero_assentos",
    "ano_ocorrencia",
    "mes_ocorrencia",
];

/// Categorical feature columns, in one-hot expansion order.
///
/// The last six only exist in the training dataset; a serving request never
/// carries them and their indicators are filled by imputation + alignment.
pub const CATEGORICAL_COLUMNS: &[&str] = &[
    "fase_operacao",
    "cat_aeronave",
    "regiao",
    "uf",
    "modelo_aeronave",
    "nome_fabricante",
    "op_padronizado",
    "hr_ocorrencia",
    "pais_fabricante",
    "tipo_motor",
    "espectro_dano",
    "tipo_operacao",
];

/// Numeric columns filled by the median imputer.
pub const IMPUTED_NUMERIC_COLUMNS: &[&str] = &[
    "peso_max_decolagem",
    "numero_assentos",
    "latitude",
    "longitude",
    "ano_ocorrencia",
    "mes_ocorrencia",
];

/// Categorical columns filled by the mode imputer.
/// `cat_aeronave` and `uf` are intentionally not imputed.
pub const IMPUTED_CATEGORICAL_COLUMNS: &[&str] = &[
    "op_padronizado",
    "hr_ocorrencia",
    "regiao",
    "fase_operacao",
    "modelo_aeronave",
    "nome_fabricante",
    "pais_fabricante",
    "tipo_motor",
    "espectro_dano",
    "tipo_operacao",
];

/// Raw date column, source of `ano_ocorrencia` / `mes_ocorrencia`.
pub const DATE_COLUMN: &str = "dt_ocorrencia";

/// Binary training label: fatal crew injuries present.
pub const LABEL_COLUMN: &str = "les_fatais_trip";

pub fn is_numeric_column(name: &str) -> bool {
    NUMERIC_COLUMNS.contains(&name)
}

pub fn is_categorical_column(name: &str) -> bool {
    CATEGORICAL_COLUMNS.contains(&name)
}

// ============================================================================
// TRAINING COLUMN SCHEMA
// ============================================================================

/// The ordered set of encoded column names produced by one-hot expansion of
/// the training set. Captured once at fit time, persisted, and replayed
/// read-only for the lifetime of the serving process.
///
/// Invariant: every vector scored at inference is re-expressed against
/// exactly this schema - same length, same order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingColumns(pub Vec<String>);

impl TrainingColumns {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    /// Resolve an encoded column name back to its meaning.
    ///
    /// Indicator names are `"{column}_{value}"`; values may themselves
    /// contain underscores, so resolution matches against the fixed column
    /// lists instead of splitting on the separator.
    pub fn resolve(name: &str) -> Option<EncodedColumn<'_>> {
        if is_numeric_column(name) {
            return Some(EncodedColumn::Numeric(name));
        }
        for &col in CATEGORICAL_COLUMNS {
            if let Some(rest) = name.strip_prefix(col) {
                if let Some(value) = rest.strip_prefix('_') {
                    return Some(EncodedColumn::Indicator { column: col, value });
                }
            }
        }
        None
    }
}

/// A resolved encoded column: either a numeric passthrough or a one-hot
/// indicator for a specific (column, value) pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EncodedColumn<'a> {
    Numeric(&'a str),
    Indicator { column: &'static str, value: &'a str },
}

// ============================================================================
// TESTS
// ============================================================================

//! Imputers - learned fill values for missing fields.
//!
//! Statistics are computed once over the feature-engineered training set and
//! are immutable afterwards. Applying is a `&self` operation on a fitted
//! value; there is no way to refit from serving data, so predictions can
//! never depend on request batch composition.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::record::AccidentRecord;
use crate::schema::{IMPUTED_CATEGORICAL_COLUMNS, IMPUTED_NUMERIC_COLUMNS};

// ============================================================================
// MEDIAN IMPUTER
// ============================================================================

/// Per-column medians for the configured numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedianImputer {
    pub medians: BTreeMap<String, f64>,
}

impl MedianImputer {
    /// Learn the median of every configured numeric column.
    /// Columns with no observed value get no statistic.
    pub fn fit(records: &[AccidentRecord]) -> Self {
        let mut medians = BTreeMap::new();
        for &column in IMPUTED_NUMERIC_COLUMNS {
            let mut values: Vec<f64> =
                records.iter().filter_map(|r| r.numeric(column)).collect();
            if values.is_empty() {
                continue;
            }
            values.sort_by(|a, b| a.partial_cmp(b).unwrap());
            medians.insert(column.to_string(), median_of_sorted(&values));
        }
        Self { medians }
    }

    /// Fill missing configured columns in place with the learned medians.
    pub fn apply(&self, record: &mut AccidentRecord) {
        for &column in IMPUTED_NUMERIC_COLUMNS {
            if record.numeric(column).is_none() {
                if let Some(&median) = self.medians.get(column) {
                    record.set_numeric(column, median);
                }
            }
        }
    }
}

fn median_of_sorted(values: &[f64]) -> f64 {
    let n = values.len();
    if n % 2 == 1 {
        values[n / 2]
    } else {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    }
}

// ============================================================================
// MODE IMPUTER
// ============================================================================

/// Per-column modes for the configured categorical columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeImputer {
    pub modes: BTreeMap<String, String>,
}

impl ModeImputer {
    /// Learn the most frequent value of every configured categorical column.
    /// Frequency ties break to the lexicographically smallest value.
    pub fn fit(records: &[AccidentRecord]) -> Self {
        let mut modes = BTreeMap::new();
        for &column in IMPUTED_CATEGORICAL_COLUMNS {
            let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
            for record in records {
                if let Some(value) = record.categorical(column) {
                    *counts.entry(value).or_insert(0) += 1;
                }
            }
            // Ties on count fall to the lexicographically smallest value.
            let mode = counts
                .iter()
                .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
                .map(|(value, _)| value.to_string());
            if let Some(mode) = mode {
                modes.insert(column.to_string(), mode);
            }
        }
        Self { modes }
    }

    /// Fill missing configured columns in place with the learned modes.
    pub fn apply(&self, record: &mut AccidentRecord) {
        for &column in IMPUTED_CATEGORICAL_COLUMNS {
            if record.categorical(column).is_none() {
                if let Some(mode) = self.modes.get(column) {
                    record.set_categorical(column, mode.clone());
                }
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_latitude(latitude: Option<f64>) -> AccidentRecord {
        AccidentRecord { latitude, ..Default::default() }
    }

    #[test]
    fn test_median_odd_count() {
        let records: Vec<_> =
            [3.0, 1.0, 2.0].iter().map(|&v| record_with_latitude(Some(v))).collect();
        let imputer = MedianImputer::fit(&records);
        assert_eq!(imputer.medians["latitude"], 2.0);
    }

    #[test]
    fn test_median_even_count_averages_middle() {
        let records: Vec<_> =
            [1.0, 2.0, 3.0, 10.0].iter().map(|&v| record_with_latitude(Some(v))).collect();
        let imputer = MedianImputer::fit(&records);
        assert_eq!(imputer.medians["latitude"], 2.5);
    }

    #[test]
    fn test_median_apply_fills_only_missing() {
        let records: Vec<_> =
            [1.0, 5.0, 9.0].iter().map(|&v| record_with_latitude(Some(v))).collect();
        let imputer = MedianImputer::fit(&records);

        let mut missing = record_with_latitude(None);
        imputer.apply(&mut missing);
        assert_eq!(missing.latitude, Some(5.0));

        let mut present = record_with_latitude(Some(-7.0));
        imputer.apply(&mut present);
        assert_eq!(present.latitude, Some(-7.0));
    }

    #[test]
    fn test_mode_picks_most_frequent() {
        let records: Vec<AccidentRecord> = ["SUDESTE", "SUL", "SUDESTE"]
            .iter()
            .map(|&v| AccidentRecord { regiao: Some(v.to_string()), ..Default::default() })
            .collect();
        let imputer = ModeImputer::fit(&records);
        assert_eq!(imputer.modes["regiao"], "SUDESTE");
    }

    #[test]
    fn test_mode_tie_breaks_lexicographically() {
        let records: Vec<AccidentRecord> = ["SUL", "NORTE", "SUL", "NORTE"]
            .iter()
            .map(|&v| AccidentRecord { regiao: Some(v.to_string()), ..Default::default() })
            .collect();
        let imputer = ModeImputer::fit(&records);
        assert_eq!(imputer.modes["regiao"], "NORTE");
    }

    #[test]
    fn test_mode_skips_unconfigured_columns() {
        let records = vec![AccidentRecord {
            uf: Some("SP".to_string()),
            regiao: Some("SUDESTE".to_string()),
            ..Default::default()
        }];
        let imputer = ModeImputer::fit(&records);
        assert!(!imputer.modes.contains_key("uf"));

        let mut record = AccidentRecord::default();
        imputer.apply(&mut record);
        assert_eq!(record.uf, None);
        assert_eq!(record.regiao.as_deref(), Some("SUDESTE"));
    }
}

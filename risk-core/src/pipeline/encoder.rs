//! One-hot encoding against the training column schema.
//!
//! Fitting enumerates the categories observed in training and freezes the
//! encoded column order; applying builds a vector directly against that
//! frozen order, which gives reindex semantics for free: indicators for
//! unseen categories never materialize, and schema columns with no
//! counterpart in the record come out as zero.

use std::collections::BTreeSet;

use crate::error::PipelineError;
use crate::record::AccidentRecord;
use crate::schema::{CATEGORICAL_COLUMNS, EncodedColumn, NUMERIC_COLUMNS, TrainingColumns};

/// Build the training column schema: numeric columns in layout order, then
/// one `"{column}_{value}"` indicator per observed category, values sorted
/// within each column.
pub fn fit(records: &[AccidentRecord]) -> TrainingColumns {
    let mut columns: Vec<String> =
        NUMERIC_COLUMNS.iter().map(|c| c.to_string()).collect();

    for &column in CATEGORICAL_COLUMNS {
        // BTreeSet keeps the values sorted, matching the expansion order
        // the scaler statistics were computed in.
        let values: BTreeSet<&str> =
            records.iter().filter_map(|r| r.categorical(column)).collect();
        for value in values {
            columns.push(format!("{}_{}", column, value));
        }
    }

    TrainingColumns(columns)
}

/// Encode one record against a schema, preserving its length and order.
pub fn encode(
    record: &AccidentRecord,
    schema: &TrainingColumns,
) -> Result<Vec<f64>, PipelineError> {
    let mut vector = Vec::with_capacity(schema.len());

    for name in schema.names() {
        let resolved = TrainingColumns::resolve(name)
            .ok_or_else(|| PipelineError::Schema(name.clone()))?;
        let value = match resolved {
            EncodedColumn::Numeric(column) => {
                record.numeric(column).ok_or_else(|| PipelineError::InvalidInput {
                    column: column.to_string(),
                    reason: "numeric value missing after imputation".to_string(),
                })?
            }
            EncodedColumn::Indicator { column, value } => {
                match record.categorical(column) {
                    Some(observed) if observed == value => 1.0,
                    _ => 0.0,
                }
            }
        };
        vector.push(value);
    }

    Ok(vector)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(region: &str, uf: &str) -> AccidentRecord {
        AccidentRecord {
            latitude: Some(-23.5),
            longitude: Some(-46.6),
            peso_max_decolagem: Some(5700.0),
            numero_assentos: Some(9.0),
            ano_ocorrencia: Some(2020.0),
            mes_ocorrencia: Some(6.0),
            regiao: Some(region.to_string()),
            uf: Some(uf.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_schema_starts_with_numeric_columns() {
        let schema = fit(&[sample("SUDESTE", "SP")]);
        assert_eq!(&schema.names()[..6], NUMERIC_COLUMNS);
    }

    #[test]
    fn test_schema_sorts_categories_within_column() {
        let schema = fit(&[sample("SUL", "RS"), sample("NORDESTE", "BA"), sample("SUL", "SC")]);
        let region_cols: Vec<_> = schema
            .names()
            .iter()
            .filter(|n| n.starts_with("regiao_"))
            .collect();
        assert_eq!(region_cols, ["regiao_NORDESTE", "regiao_SUL"]);
    }

    #[test]
    fn test_encode_matches_schema_length_and_order() {
        let training = [sample("SUDESTE", "SP"), sample("SUL", "RS")];
        let schema = fit(&training);
        let vector = encode(&training[0], &schema).unwrap();
        assert_eq!(vector.len(), schema.len());

        let sudeste = schema.names().iter().position(|n| n == "regiao_SUDESTE").unwrap();
        let sul = schema.names().iter().position(|n| n == "regiao_SUL").unwrap();
        assert_eq!(vector[sudeste], 1.0);
        assert_eq!(vector[sul], 0.0);
    }

    #[test]
    fn test_encode_unseen_category_yields_zero_block() {
        let schema = fit(&[sample("SUDESTE", "SP"), sample("SUL", "RS")]);
        let unseen = sample("CENTRO-OESTE", "GO");
        let vector = encode(&unseen, &schema).unwrap();
        // Same shape as training, no indicator fires for regiao or uf.
        assert_eq!(vector.len(), schema.len());
        for (name, value) in schema.names().iter().zip(&vector) {
            if name.starts_with("regiao_") || name.starts_with("uf_") {
                assert_eq!(*value, 0.0, "column {}", name);
            }
        }
    }

    #[test]
    fn test_encode_absent_categorical_yields_zero_block() {
        let schema = fit(&[sample("SUDESTE", "SP")]);
        let mut record = sample("SUDESTE", "SP");
        record.regiao = None;
        let vector = encode(&record, &schema).unwrap();
        let sudeste = schema.names().iter().position(|n| n == "regiao_SUDESTE").unwrap();
        assert_eq!(vector[sudeste], 0.0);
    }

    #[test]
    fn test_encode_missing_numeric_is_invalid_input() {
        let schema = fit(&[sample("SUDESTE", "SP")]);
        let mut record = sample("SUDESTE", "SP");
        record.latitude = None;
        let err = encode(&record, &schema).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidInput { .. }));
    }
}

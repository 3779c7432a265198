//! Prediction handlers - single record and batch.
//!
//! Wire field names stay in Portuguese for compatibility with the original
//! clients. The handlers validate, convert to the core record shape and
//! delegate to the read-only scorer; no transformation logic lives here.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use aerorisk_core::{AccidentRecord, BatchSummary, Prediction, Scorer};

use crate::{ApiError, ApiResult, AppState};

// ============================================================================
// REQUEST
// ============================================================================

/// One accident record as received on the wire. All fields required.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AccidentRequest {
    #[validate(range(min = -90.0, max = 90.0, message = "latitude fora de [-90, 90]"))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0, message = "longitude fora de [-180, 180]"))]
    pub longitude: f64,

    #[validate(range(min = 0.0, message = "peso não pode ser negativo"))]
    pub peso_max_decolagem: f64,

    #[validate(range(min = 0, message = "número de assentos não pode ser negativo"))]
    pub numero_assentos: i64,

    #[validate(range(min = 1900, max = 2100, message = "ano fora de [1900, 2100]"))]
    pub ano_ocorrencia: i64,

    #[validate(range(min = 1, max = 12, message = "mês fora de [1, 12]"))]
    pub mes_ocorrencia: i64,

    #[validate(length(min = 1, message = "valor vazio"))]
    pub fase_operacao: String,

    #[validate(length(min = 1, message = "valor vazio"))]
    pub cat_aeronave: String,

    #[validate(length(min = 1, message = "valor vazio"))]
    pub regiao: String,

    #[validate(length(min = 1, message = "valor vazio"))]
    pub uf: String,

    #[validate(length(min = 1, message = "valor vazio"))]
    pub modelo_aeronave: String,

    #[validate(length(min = 1, message = "valor vazio"))]
    pub nome_fabricante: String,
}

impl AccidentRequest {
    /// Convert to the core record shape. The training-only categorical
    /// fields stay absent; the pipeline's imputers fill them.
    fn into_record(self) -> AccidentRecord {
        AccidentRecord {
            latitude: Some(self.latitude),
            longitude: Some(self.longitude),
            peso_max_decolagem: Some(self.peso_max_decolagem),
            numero_assentos: Some(self.numero_assentos as f64),
            ano_ocorrencia: Some(self.ano_ocorrencia as f64),
            mes_ocorrencia: Some(self.mes_ocorrencia as f64),
            fase_operacao: Some(self.fase_operacao),
            cat_aeronave: Some(self.cat_aeronave),
            regiao: Some(self.regiao),
            uf: Some(self.uf),
            modelo_aeronave: Some(self.modelo_aeronave),
            nome_fabricante: Some(self.nome_fabricante),
            ..Default::default()
        }
    }
}

// ============================================================================
// RESPONSE
// ============================================================================

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub probabilidade_fatal: f64,
    pub predicao: &'static str,
    pub nivel_risco: &'static str,
    pub recomendacao: &'static str,
    pub interpretacao: String,
    pub threshold_utilizado: f64,
}

impl From<Prediction> for PredictResponse {
    fn from(prediction: Prediction) -> Self {
        Self {
            probabilidade_fatal: prediction.probability,
            predicao: prediction.label(),
            nivel_risco: prediction.tier.as_str(),
            recomendacao: prediction.tier.recommendation(),
            interpretacao: prediction.interpretation(),
            threshold_utilizado: prediction.threshold,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RiskDistribution {
    #[serde(rename = "BAIXO")]
    pub baixo: usize,
    #[serde(rename = "MODERADO")]
    pub moderado: usize,
    #[serde(rename = "ALTO")]
    pub alto: usize,
    #[serde(rename = "CRÍTICO")]
    pub critico: usize,
}

impl From<&BatchSummary> for RiskDistribution {
    fn from(summary: &BatchSummary) -> Self {
        let [baixo, moderado, alto, critico] = summary.tier_counts;
        Self { baixo, moderado, alto, critico }
    }
}

/// A batch element that failed validation and was skipped.
#[derive(Debug, Serialize)]
pub struct InvalidRecord {
    pub indice: usize,
    pub erro: String,
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub total_acidentes: usize,
    pub previstos_fatais: usize,
    pub previstos_nao_fatais: usize,
    pub taxa_fatalidade_prevista: f64,
    pub probabilidade_media: f64,
    pub distribuicao_risco: RiskDistribution,
    pub resultados: Vec<PredictResponse>,
    pub registros_invalidos: Vec<InvalidRecord>,
}

// ============================================================================
// HANDLERS
// ============================================================================

/// Score one accident record.
pub async fn single(
    State(state): State<AppState>,
    Json(request): Json<AccidentRequest>,
) -> ApiResult<Json<PredictResponse>> {
    let bundle = state.bundle.as_deref().ok_or(ApiError::ModelUnavailable)?;
    request.validate()?;

    let prediction = Scorer::new(bundle).score(&request.into_record())?;
    Ok(Json(prediction.into()))
}

/// Score a batch of accident records.
///
/// A malformed element never aborts the batch: it is reported in
/// `registros_invalidos` and the remainder is scored. The aggregates are
/// computed over the scored set, so fatal + non-fatal == total holds.
pub async fn batch(
    State(state): State<AppState>,
    Json(requests): Json<Vec<serde_json::Value>>,
) -> ApiResult<Json<BatchResponse>> {
    let bundle = state.bundle.as_deref().ok_or(ApiError::ModelUnavailable)?;
    let scorer = Scorer::new(bundle);

    let mut predictions: Vec<Prediction> = Vec::with_capacity(requests.len());
    let mut invalid = Vec::new();

    for (index, value) in requests.into_iter().enumerate() {
        let request: AccidentRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                invalid.push(InvalidRecord { indice: index, erro: e.to_string() });
                continue;
            }
        };
        if let Err(e) = request.validate() {
            invalid.push(InvalidRecord {
                indice: index,
                erro: crate::error::validation_detail(&e),
            });
            continue;
        }
        match scorer.score(&request.into_record()) {
            Ok(prediction) => predictions.push(prediction),
            Err(e) => {
                invalid.push(InvalidRecord { indice: index, erro: e.to_string() });
            }
        }
    }

    if !invalid.is_empty() {
        tracing::warn!("batch: {} record(s) skipped as invalid", invalid.len());
    }

    Ok(Json(batch_response(&predictions, invalid)))
}

fn batch_response(predictions: &[Prediction], invalid: Vec<InvalidRecord>) -> BatchResponse {
    let summary = BatchSummary::from_predictions(predictions);
    BatchResponse {
        total_acidentes: summary.total,
        previstos_fatais: summary.predicted_fatal,
        previstos_nao_fatais: summary.predicted_non_fatal,
        taxa_fatalidade_prevista: summary.fatality_rate,
        probabilidade_media: summary.mean_probability,
        distribuicao_risco: RiskDistribution::from(&summary),
        resultados: predictions.iter().cloned().map(PredictResponse::from).collect(),
        registros_invalidos: invalid,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use aerorisk_core::RiskTier;

    fn request_json() -> serde_json::Value {
        serde_json::json!({
            "latitude": -23.5505,
            "longitude": -46.6333,
            "peso_max_decolagem": 5700.0,
            "numero_assentos": 9,
            "ano_ocorrencia": 2020,
            "mes_ocorrencia": 6,
            "fase_operacao": "DECOLAGEM",
            "cat_aeronave": "AVIAO",
            "regiao": "SUDESTE",
            "uf": "SP",
            "modelo_aeronave": "EMB-810C",
            "nome_fabricante": "EMBRAER"
        })
    }

    fn prediction(probability: f64) -> Prediction {
        Prediction {
            probability,
            fatal: probability >= 0.26,
            threshold: 0.26,
            tier: RiskTier::from_probability(probability),
        }
    }

    #[test]
    fn test_request_parses_and_validates() {
        let request: AccidentRequest = serde_json::from_value(request_json()).unwrap();
        assert!(request.validate().is_ok());

        let record = request.into_record();
        assert_eq!(record.numero_assentos, Some(9.0));
        assert_eq!(record.op_padronizado, None);
    }

    #[test]
    fn test_request_missing_field_is_rejected() {
        let mut value = request_json();
        value.as_object_mut().unwrap().remove("uf");
        let result: Result<AccidentRequest, _> = serde_json::from_value(value);
        assert!(result.is_err());
    }

    #[test]
    fn test_request_out_of_range_is_rejected() {
        let mut value = request_json();
        value["mes_ocorrencia"] = serde_json::json!(13);
        let request: AccidentRequest = serde_json::from_value(value).unwrap();
        let err = ApiError::from(request.validate().unwrap_err());
        match err {
            ApiError::ValidationError(msg) => assert!(msg.contains("mes_ocorrencia")),
            other => panic!("expected ValidationError, got {:?}", other),
        }
    }

    #[test]
    fn test_batch_response_invariants() {
        let predictions: Vec<Prediction> =
            [0.1, 0.35, 0.75].iter().map(|&p| prediction(p)).collect();
        let response = batch_response(
            &predictions,
            vec![InvalidRecord { indice: 3, erro: "campo 'uf'".to_string() }],
        );

        assert_eq!(response.total_acidentes, 3);
        assert_eq!(
            response.previstos_fatais + response.previstos_nao_fatais,
            response.total_acidentes
        );
        let d = &response.distribuicao_risco;
        assert_eq!(d.baixo + d.moderado + d.alto + d.critico, response.total_acidentes);
        assert_eq!(response.resultados.len(), 3);
        assert_eq!(response.registros_invalidos.len(), 1);
    }

    #[test]
    fn test_batch_response_empty() {
        let response = batch_response(&[], Vec::new());
        assert_eq!(response.total_acidentes, 0);
        assert_eq!(response.taxa_fatalidade_prevista, 0.0);
        assert_eq!(response.probabilidade_media, 0.0);
    }

    #[test]
    fn test_response_wire_fields() {
        let response = PredictResponse::from(prediction(0.7));
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["probabilidade_fatal"], 0.7);
        assert_eq!(value["predicao"], "FATAL");
        assert_eq!(value["nivel_risco"], "CRÍTICO");
        assert_eq!(value["threshold_utilizado"], 0.26);
        assert!(value["interpretacao"].as_str().unwrap().contains("ATENÇÃO"));
    }
}

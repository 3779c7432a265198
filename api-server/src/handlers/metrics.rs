//! Model metrics readback handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::{ApiError, ApiResult, AppState};

#[derive(Serialize)]
pub struct ModelMetrics {
    modelo: &'static str,
    threshold_otimizado: f64,
    f1_score_validacao: f64,
    total_features: usize,
    intercepto: f64,
}

pub async fn read(State(state): State<AppState>) -> ApiResult<Json<ModelMetrics>> {
    let bundle = state.bundle.as_deref().ok_or(ApiError::ModelUnavailable)?;

    Ok(Json(ModelMetrics {
        modelo: "regressao_logistica",
        threshold_otimizado: bundle.threshold.threshold,
        f1_score_validacao: bundle.threshold.f1,
        total_features: bundle.preprocessor.n_features(),
        intercepto: bundle.model.intercept,
    }))
}

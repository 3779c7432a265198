//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    modelo_carregado: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    threshold: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    features_esperadas: Option<usize>,
    version: &'static str,
    timestamp: i64,
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    let bundle = state.bundle.as_deref();
    Json(HealthResponse {
        status: if bundle.is_some() { "ok" } else { "degraded" },
        modelo_carregado: bundle.is_some(),
        threshold: bundle.map(|b| b.threshold.threshold),
        features_esperadas: bundle.map(|b| b.preprocessor.n_features()),
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().timestamp(),
    })
}

//! Service info handler

use std::collections::BTreeMap;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct ServiceInfo {
    mensagem: &'static str,
    versao: &'static str,
    ambiente: String,
    endpoints: BTreeMap<&'static str, &'static str>,
}

pub async fn info(State(state): State<AppState>) -> Json<ServiceInfo> {
    let endpoints = BTreeMap::from([
        ("/prever", "POST - Predição de fatalidade para um acidente"),
        ("/prever_lote", "POST - Predição em lote"),
        ("/metricas", "GET - Métricas do modelo carregado"),
        ("/health", "GET - Status do serviço"),
    ]);

    Json(ServiceInfo {
        mensagem: "API de Previsão de Acidentes Aéreos Fatais",
        versao: env!("CARGO_PKG_VERSION"),
        ambiente: state.config.environment.clone(),
        endpoints,
    })
}

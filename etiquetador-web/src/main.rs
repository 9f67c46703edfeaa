//! Servidor web Axum para análise NER com modelos selecionáveis.
//!
//! Rotas:
//! - `GET /` — página principal (template com a lista de modelos).
//! - `GET /models` — lista JSON dos classificadores disponíveis.
//! - `POST /predict` — analisa um texto com o modelo indicado.
//! - `POST /reload` — relê os artefatos compartilhados e esvazia o cache de
//!   modelos (gancho de invalidação explícito).

mod error;

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use askama::Template;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Json};
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::info;

use etiquetador_core::{ArtifactStore, Entity, ModelRegistry, NerPipeline, TokenLabel};

use crate::error::ApiError;

/// Limite de tamanho do texto aceito pela API (em caracteres).
const MAX_TEXT_CHARS: usize = 5000;

/// Estado compartilhado da aplicação
struct AppState {
    pipeline: NerPipeline,
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    models: Vec<String>,
}

#[derive(Deserialize)]
struct PredictRequest {
    text: String,
    #[serde(default)]
    model_name: Option<String>,
}

#[derive(Serialize)]
struct PredictResponse {
    ok: bool,
    predictions: Vec<TokenLabel>,
    entities: Vec<Entity>,
    model_used: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    let model_dir = env::var("MODELOS_DIR").unwrap_or_else(|_| "saved_models".to_string());
    let store = Arc::new(ArtifactStore::open(&model_dir));
    let registry = ModelRegistry::new(&model_dir);
    let warmed = registry.preload();
    info!("{warmed} modelo(s) pré-carregado(s) de {model_dir}");

    let pipeline = NerPipeline::new(store, registry);
    let state = Arc::new(AppState { pipeline });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let static_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static");

    let app = Router::new()
        .route("/", get(index_handler))
        .route("/models", get(models_handler))
        .route("/predict", post(predict_handler))
        .route("/reload", post(reload_handler))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(cors)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000")
        .await
        .context("não foi possível escutar em 0.0.0.0:3000")?;
    info!("🚀 Servidor NER iniciado em http://localhost:3000");
    axum::serve(listener, app)
        .await
        .context("servidor encerrou com erro")?;
    Ok(())
}

/// Retorna a página principal com a lista de modelos no seletor
async fn index_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let template = IndexTemplate {
        models: state.pipeline.registry().available(),
    };
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
    }
}

/// Lista os classificadores disponíveis no diretório de modelos
async fn models_handler(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.pipeline.registry().available())
}

/// Análise NER via HTTP POST
async fn predict_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, ApiError> {
    let text = req.text.trim();
    if text.is_empty() {
        return Err(ApiError::BadRequest("O texto está vazio.".to_string()));
    }
    if text.chars().count() > MAX_TEXT_CHARS {
        return Err(ApiError::BadRequest(format!(
            "Texto longo demais (máximo {MAX_TEXT_CHARS} caracteres)."
        )));
    }
    let model_name = req
        .model_name
        .as_deref()
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Nenhum modelo selecionado.".to_string()))?;

    info!("analisando {} chars com {model_name}", text.len());
    let analysis = state.pipeline.analyze(text, model_name)?;

    Ok(Json(PredictResponse {
        ok: true,
        predictions: analysis.predictions,
        entities: analysis.entities,
        model_used: model_name.to_string(),
    }))
}

/// Relê artefatos compartilhados e esvazia o cache de classificadores
async fn reload_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    state.pipeline.store().reload();
    state.pipeline.registry().clear();
    info!("artefatos recarregados por requisição explícita");
    Json(serde_json::json!({
        "ok": true,
        "models": state.pipeline.registry().available(),
    }))
}

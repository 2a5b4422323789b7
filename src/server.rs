//! HTTP binding of the translator's consumer contract.
//!
//! Every route except `/health` sits behind the `X-API-Key` check when an
//! API key is configured.

use crate::i18n::{Language, LanguageDescriptor, LanguageRegistry, MetricsReport};
use crate::options::OptionItem;
use crate::security::{is_authorized, API_KEY_HEADER};
use crate::state::LanguageSnapshot;
use crate::translator::{BatchOptions, TranslateOptions, Translator};
use anyhow::Context;
use axum::{
    extract::{Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    pub translator: Translator,
    pub api_key: Option<Arc<str>>,
}

impl AppState {
    pub fn new(translator: Translator, api_key: Option<String>) -> Self {
        Self {
            translator,
            api_key: api_key.map(Arc::from),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("missing or invalid API key")]
    Unauthorized,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

// ==================== Request/response bodies ====================

#[derive(Debug, Deserialize)]
pub struct ChangeLanguageRequest {
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    pub text: String,
    pub source_language: Option<String>,
    #[serde(default)]
    pub force: bool,
    pub debounce_ms: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct TranslateResponse {
    pub text: String,
    pub language: Language,
}

#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    pub texts: Vec<String>,
    pub source_language: Option<String>,
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub texts: Vec<String>,
    pub language: Language,
}

#[derive(Debug, Deserialize)]
pub struct OptionsRequest {
    pub options: Vec<OptionItem>,
    pub source_language: Option<String>,
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    pub options: Vec<OptionItem>,
    pub language: Language,
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub text: String,
    pub source_language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub loading: bool,
    pub cached: String,
}

#[derive(Debug, Deserialize)]
pub struct DetectRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct DetectResponse {
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ApplyDetectedResponse {
    pub applied: Option<Language>,
    pub state: LanguageSnapshot,
}

fn parse_source(code: Option<&str>) -> Result<Language, ApiError> {
    match code {
        None => Ok(Language::canonical()),
        Some(code) => Language::from_code(code).map_err(|e| ApiError::BadRequest(e.to_string())),
    }
}

// ==================== Router ====================

pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/languages", get(list_languages))
        .route("/language", get(get_language).put(change_language))
        .route("/language/auto-detect", post(toggle_auto_detect))
        .route("/translate", post(translate))
        .route("/translate/batch", post(translate_batch))
        .route("/translate/options", post(translate_options))
        .route("/translate/status", get(translation_status))
        .route("/detect", post(detect))
        .route("/detect/apply", post(apply_detected))
        .route("/metrics", get(metrics))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_api_key));

    Router::new()
        .route("/health", get(health))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `port` on all interfaces and serve until Ctrl-C.
pub async fn serve(state: AppState, port: u16) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    if !is_authorized(state.api_key.as_deref(), provided) {
        warn!(path = %request.uri().path(), "Rejected request with missing or invalid API key");
        return Err(ApiError::Unauthorized);
    }
    Ok(next.run(request).await)
}

// ==================== Handlers ====================

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn list_languages() -> Json<Vec<&'static LanguageDescriptor>> {
    Json(LanguageRegistry::get().list_enabled())
}

async fn get_language(State(state): State<AppState>) -> Json<LanguageSnapshot> {
    Json(state.translator.snapshot())
}

async fn change_language(
    State(state): State<AppState>,
    Json(body): Json<ChangeLanguageRequest>,
) -> Result<Json<LanguageSnapshot>, ApiError> {
    let language =
        Language::from_code(body.code.trim()).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    state.translator.change_language(language);
    Ok(Json(state.translator.snapshot()))
}

async fn toggle_auto_detect(State(state): State<AppState>) -> Json<LanguageSnapshot> {
    state.translator.toggle_auto_detect();
    Json(state.translator.snapshot())
}

async fn translate(
    State(state): State<AppState>,
    Json(body): Json<TranslateRequest>,
) -> Result<Json<TranslateResponse>, ApiError> {
    let mut options = TranslateOptions::default().with_source(parse_source(body.source_language.as_deref())?);
    if let Some(ms) = body.debounce_ms {
        options = options.with_debounce(Duration::from_millis(ms));
    }
    if body.force {
        options = options.forced();
    }

    let text = state.translator.t(&body.text, options).await;
    Ok(Json(TranslateResponse {
        text,
        language: state.translator.current_language(),
    }))
}

fn batch_options(source: Option<&str>, force: bool) -> Result<BatchOptions, ApiError> {
    let options = BatchOptions::default().with_source(parse_source(source)?);
    Ok(if force { options.forced() } else { options })
}

async fn translate_batch(
    State(state): State<AppState>,
    Json(body): Json<BatchRequest>,
) -> Result<Json<BatchResponse>, ApiError> {
    let options = batch_options(body.source_language.as_deref(), body.force)?;
    let texts = state.translator.t_batch(&body.texts, options).await;
    Ok(Json(BatchResponse {
        texts,
        language: state.translator.current_language(),
    }))
}

async fn translate_options(
    State(state): State<AppState>,
    Json(body): Json<OptionsRequest>,
) -> Result<Json<OptionsResponse>, ApiError> {
    let options = batch_options(body.source_language.as_deref(), body.force)?;
    let translated = state.translator.t_options(&body.options, options).await;
    Ok(Json(OptionsResponse {
        options: translated,
        language: state.translator.current_language(),
    }))
}

async fn translation_status(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<StatusResponse>, ApiError> {
    let source = parse_source(query.source_language.as_deref())?;
    Ok(Json(StatusResponse {
        loading: state.translator.is_loading(&query.text, source),
        cached: state.translator.get_cached(&query.text, source),
    }))
}

async fn detect(
    State(state): State<AppState>,
    Json(body): Json<DetectRequest>,
) -> Json<DetectResponse> {
    Json(DetectResponse {
        language: state.translator.detect_language(&body.text).await,
    })
}

async fn apply_detected(
    State(state): State<AppState>,
    Json(body): Json<DetectRequest>,
) -> Json<ApplyDetectedResponse> {
    let applied = state.translator.apply_detected_language(&body.text).await;
    Json(ApplyDetectedResponse {
        applied,
        state: state.translator.snapshot(),
    })
}

async fn metrics(State(state): State<AppState>) -> Json<MetricsReport> {
    Json(state.translator.metrics())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_source_defaults_to_canonical() {
        assert_eq!(parse_source(None).unwrap(), Language::ENGLISH);
        assert_eq!(parse_source(Some("hi")).unwrap(), Language::HINDI);
    }

    #[test]
    fn test_parse_source_rejects_unknown() {
        assert!(matches!(parse_source(Some("xx")), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_api_error_status_codes() {
        assert_eq!(
            ApiError::BadRequest("bad".to_string()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unauthorized.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_batch_options_force_flag() {
        assert!(batch_options(None, true).unwrap().force);
        assert!(!batch_options(Some("en"), false).unwrap().force);
    }
}

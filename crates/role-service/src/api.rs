//! HTTP API: health, readiness, prediction and Prometheus metrics

use crate::config::FallbackPolicy;
use crate::error::ApiError;
use anyhow::Context;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use prometheus::{Encoder, TextEncoder};
use role_core::{
    artifacts::{CLASSIFIER_FILE, LABEL_ENCODER_FILE, VECTORIZER_FILE, ARTIFACTS_DIR_ENV},
    select_strategy, ArtifactSet, HealthStatus, PredictRequest, PredictionResult,
    ReadinessResponse, ServiceMetrics, Strategy, StructuredLogger,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub artifacts: Arc<ArtifactSet>,
    pub artifacts_dir: PathBuf,
    pub fallback_policy: FallbackPolicy,
    pub metrics: ServiceMetrics,
    pub logger: StructuredLogger,
}

impl AppState {
    pub fn new(
        artifacts: Arc<ArtifactSet>,
        artifacts_dir: PathBuf,
        fallback_policy: FallbackPolicy,
        metrics: ServiceMetrics,
        logger: StructuredLogger,
    ) -> Self {
        Self {
            artifacts,
            artifacts_dir,
            fallback_policy,
            metrics,
            logger,
        }
    }

    fn unavailable_message(&self) -> String {
        format!(
            "Artifacts not loaded. Place {}, {}, {} in {} or set {}.",
            VECTORIZER_FILE,
            CLASSIFIER_FILE,
            LABEL_ENCODER_FILE,
            self.artifacts_dir.display(),
            ARTIFACTS_DIR_ENV
        )
    }
}

/// Artifact presence; always 200, missing artifacts are reported, not failed
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthStatus> {
    Json(state.artifacts.health())
}

/// Readiness check response - returns 200 if predictions can be served, 503 otherwise
async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let allow_heuristic = state.fallback_policy == FallbackPolicy::Heuristic;
    let readiness = ReadinessResponse::evaluate(&state.artifacts, allow_heuristic);

    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(readiness))
}

/// Predict a role for resume text
async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictionResult>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        state.metrics.inc_rejected("malformed_body");
        ApiError::Validation(rejection.body_text())
    })?;

    if !request.has_text() {
        state.metrics.inc_rejected("validation");
        return Err(ApiError::Validation("text must be non-empty".to_string()));
    }

    let strategy = select_strategy(&state.artifacts);
    if strategy == Strategy::Heuristic && state.fallback_policy == FallbackPolicy::Strict {
        state.metrics.inc_rejected("unavailable");
        return Err(ApiError::ServiceUnavailable(state.unavailable_message()));
    }

    let start = Instant::now();
    let result = role_core::predict(&request.text, &state.artifacts).map_err(|e| {
        state.metrics.inc_prediction_errors();
        ApiError::from(e)
    })?;

    state
        .metrics
        .observe_prediction_latency(start.elapsed().as_secs_f64());
    state.metrics.inc_predictions(strategy);
    state.logger.log_prediction(
        strategy,
        &result.role,
        result.confidence,
        request.text.chars().count(),
    );

    Ok(Json(result))
}

/// Prometheus metrics endpoint
async fn metrics() -> Result<impl IntoResponse, ApiError> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    encoder
        .encode(&metric_families, &mut buffer)
        .context("Failed to encode metrics")?;

    Ok((
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    ))
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/readyz", get(readyz))
        .route("/predict", post(predict))
        .route("/metrics", get(metrics))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Start the API server and run until Ctrl-C
pub async fn serve(addr: &str, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

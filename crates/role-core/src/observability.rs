//! Observability infrastructure for the role predictor
//!
//! Provides:
//! - Prometheus metrics (prediction latency, predictions by strategy, rejections, artifact state)
//! - Structured JSON logging with tracing

use crate::artifacts::{ArtifactKind, ArtifactSet};
use crate::models::Strategy;
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, register_int_gauge_vec,
    Histogram, IntCounter, IntCounterVec, IntGaugeVec,
};
use std::path::Path;
use std::sync::OnceLock;
use tracing::{info, warn};

/// Default histogram buckets for latency measurements (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<ServiceMetricsInner> = OnceLock::new();

/// Inner metrics structure that holds the actual Prometheus metrics
struct ServiceMetricsInner {
    prediction_latency_seconds: Histogram,
    predictions_total: IntCounterVec,
    rejected_requests_total: IntCounterVec,
    prediction_errors_total: IntCounter,
    artifact_loaded: IntGaugeVec,
}

impl ServiceMetricsInner {
    fn new() -> Self {
        Self {
            prediction_latency_seconds: register_histogram!(
                "role_predictor_prediction_latency_seconds",
                "Time spent predicting a role for one request",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register prediction_latency_seconds"),

            predictions_total: register_int_counter_vec!(
                "role_predictor_predictions_total",
                "Predictions served, by strategy",
                &["strategy"]
            )
            .expect("Failed to register predictions_total"),

            rejected_requests_total: register_int_counter_vec!(
                "role_predictor_rejected_requests_total",
                "Predict requests rejected before reaching the engine",
                &["reason"]
            )
            .expect("Failed to register rejected_requests_total"),

            prediction_errors_total: register_int_counter!(
                "role_predictor_prediction_errors_total",
                "Predictions that failed inside the trained pipeline"
            )
            .expect("Failed to register prediction_errors_total"),

            artifact_loaded: register_int_gauge_vec!(
                "role_predictor_artifact_loaded",
                "Whether each artifact is loaded (1) or missing (0)",
                &["artifact"]
            )
            .expect("Failed to register artifact_loaded"),
        }
    }
}

/// Service metrics for Prometheus exposition
///
/// This is a lightweight handle to the global metrics instance.
/// Multiple clones share the same underlying metrics.
#[derive(Clone)]
pub struct ServiceMetrics {
    _private: (),
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(ServiceMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &ServiceMetricsInner {
        GLOBAL_METRICS.get_or_init(ServiceMetricsInner::new)
    }

    /// Record a prediction latency observation
    pub fn observe_prediction_latency(&self, duration_secs: f64) {
        self.inner().prediction_latency_seconds.observe(duration_secs);
    }

    /// Count a served prediction
    pub fn inc_predictions(&self, strategy: Strategy) {
        self.inner()
            .predictions_total
            .with_label_values(&[strategy.as_str()])
            .inc();
    }

    /// Count a rejected request
    pub fn inc_rejected(&self, reason: &str) {
        self.inner()
            .rejected_requests_total
            .with_label_values(&[reason])
            .inc();
    }

    /// Count a failed prediction
    pub fn inc_prediction_errors(&self) {
        self.inner().prediction_errors_total.inc();
    }

    /// Publish artifact presence gauges
    pub fn set_artifacts(&self, artifacts: &ArtifactSet) {
        for kind in ArtifactKind::ALL {
            self.inner()
                .artifact_loaded
                .with_label_values(&[kind.as_str()])
                .set(i64::from(artifacts.is_loaded(kind)));
        }
    }
}

/// Structured logger for service events
///
/// Provides consistent JSON-formatted logging for startup, artifact
/// loading, predictions and shutdown.
#[derive(Clone)]
pub struct StructuredLogger {
    service_name: String,
}

impl StructuredLogger {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
        }
    }

    /// Log service startup
    pub fn log_startup(&self, version: &str, artifacts_dir: &Path) {
        info!(
            event = "service_started",
            service = %self.service_name,
            version = %version,
            artifacts_dir = %artifacts_dir.display(),
            "Role predictor started"
        );
    }

    /// Log the outcome of artifact loading
    pub fn log_artifacts(&self, artifacts: &ArtifactSet) {
        for source in artifacts.sources() {
            info!(
                event = "artifact_loaded",
                service = %self.service_name,
                artifact = %source.kind,
                path = %source.path.display(),
                size_bytes = source.size_bytes,
                sha256 = %source.sha256,
                "Artifact available"
            );
        }

        if artifacts.is_complete() {
            info!(
                event = "artifacts_ready",
                service = %self.service_name,
                "All artifacts loaded, trained inference enabled"
            );
        } else {
            let missing: Vec<&str> = artifacts.missing().iter().map(ArtifactKind::as_str).collect();
            warn!(
                event = "artifacts_incomplete",
                service = %self.service_name,
                missing = ?missing,
                "Artifact set incomplete, trained inference disabled"
            );
        }
    }

    /// Log a served prediction
    pub fn log_prediction(
        &self,
        strategy: Strategy,
        role: &str,
        confidence: Option<f64>,
        text_chars: usize,
    ) {
        info!(
            event = "prediction_served",
            service = %self.service_name,
            strategy = %strategy,
            role = %role,
            confidence = ?confidence,
            text_chars = text_chars,
            "Predicted resume role"
        );
    }

    /// Log service shutdown
    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "service_shutdown",
            service = %self.service_name,
            reason = %reason,
            "Role predictor shutting down"
        );
    }
}

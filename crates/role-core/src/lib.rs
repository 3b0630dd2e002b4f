//! Core library for resume role prediction
//!
//! This crate provides:
//! - Artifact loading (TF-IDF vectorizer, linear classifier, label encoder)
//! - Role prediction, trained or keyword-heuristic
//! - Health and readiness derived from loaded artifacts
//! - Metrics and structured logging

pub mod artifacts;
pub mod error;
pub mod health;
pub mod models;
pub mod observability;
pub mod predictor;

pub use artifacts::{ArtifactKind, ArtifactSet, ArtifactStore};
pub use error::{ArtifactError, PredictError};
pub use health::{HealthStatus, ReadinessResponse};
pub use models::*;
pub use observability::{ServiceMetrics, StructuredLogger};
pub use predictor::{predict, select_strategy};

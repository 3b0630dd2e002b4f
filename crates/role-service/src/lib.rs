//! HTTP facade for the resume role predictor
//!
//! Validates requests, applies the fallback policy and maps engine outcomes
//! to JSON responses. Prediction itself lives in `role_core`.

pub mod api;
pub mod config;
pub mod error;

pub use api::{create_router, serve, AppState};
pub use config::{FallbackPolicy, LogFormat, ServiceConfig};
pub use error::ApiError;

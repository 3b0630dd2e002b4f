//! Service configuration

use anyhow::{Context, Result};
use config::{Config, Environment, Map};
use role_core::artifacts::ARTIFACTS_DIR_ENV;
use serde::Deserialize;
use std::path::PathBuf;

/// Prefix for service environment variables (`ROLE_PREDICTOR_PORT`, ...)
const ENV_PREFIX: &str = "ROLE_PREDICTOR";

/// What `/predict` does when the artifact set is incomplete
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    /// Reject with 503 until every artifact is loaded
    #[default]
    Strict,
    /// Answer with the keyword heuristic
    Heuristic,
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

/// Service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Artifacts directory override, from `ARTIFACTS_DIR`
    #[serde(default)]
    pub artifacts_dir: Option<PathBuf>,

    #[serde(default)]
    pub fallback_policy: FallbackPolicy,

    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl ServiceConfig {
    /// Load configuration from the process environment
    pub fn load() -> Result<Self> {
        Self::from_vars(None)
    }

    /// Load configuration from an explicit variable map instead of the
    /// process environment
    pub fn from_vars(vars: Option<Map<String, String>>) -> Result<Self> {
        let artifacts_dir = match &vars {
            Some(vars) => vars.get(ARTIFACTS_DIR_ENV).cloned(),
            None => std::env::var(ARTIFACTS_DIR_ENV).ok(),
        }
        .filter(|dir| !dir.trim().is_empty());

        let config = Config::builder()
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .source(vars),
            )
            .set_override_option("artifacts_dir", artifacts_dir)?
            .build()?;

        config
            .try_deserialize()
            .context("Invalid role predictor configuration")
    }

    /// Socket address string to bind
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn allows_heuristic(&self) -> bool {
        self.fallback_policy == FallbackPolicy::Heuristic
    }
}

//! Core data models for the role predictor

use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer class code produced by a classifier and consumed by a label decoder
pub type EncodedLabel = i64;

/// Predicted role for a piece of resume text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub role: String,
    /// Probability in [0, 1]; `None` when the classifier cannot estimate one
    pub confidence: Option<f64>,
}

impl PredictionResult {
    pub fn new(role: impl Into<String>, confidence: Option<f64>) -> Self {
        Self {
            role: role.into(),
            confidence,
        }
    }
}

/// Request body for the predict operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    pub text: String,
}

impl PredictRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// True when the text has content after trimming
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

/// Which prediction path handled a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Vectorizer, classifier and label decoder all loaded
    Trained,
    /// Keyword rules, used when any artifact is missing
    Heuristic,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Trained => "trained",
            Strategy::Heuristic => "heuristic",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

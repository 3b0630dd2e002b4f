//! Role prediction engine
//!
//! Two mutually exclusive strategies: trained inference when the artifact set
//! is complete, keyword heuristics otherwise. Both are pure functions of the
//! text and the artifacts.

mod heuristic;
mod inference;

pub use heuristic::{
    FallbackPredictor, KeywordRule, GENERAL_CONFIDENCE, GENERAL_ROLE, KEYWORD_RULES,
};
pub use inference::{confidence_for_label, TrainedPredictor};

use crate::artifacts::ArtifactSet;
use crate::error::PredictError;
use crate::models::{PredictionResult, Strategy};
use tracing::debug;

/// Strategy the engine will use for this artifact set
pub fn select_strategy(artifacts: &ArtifactSet) -> Strategy {
    if artifacts.is_complete() {
        Strategy::Trained
    } else {
        Strategy::Heuristic
    }
}

/// Predict a role for non-empty text.
///
/// Errors only come from the trained pipeline (malformed artifacts, shape
/// mismatches, unknown labels); they are never converted into a heuristic
/// answer.
pub fn predict(text: &str, artifacts: &ArtifactSet) -> Result<PredictionResult, PredictError> {
    match artifacts.complete() {
        Some(complete) => TrainedPredictor::new(complete).predict(text),
        None => {
            debug!(missing = ?artifacts.missing(), "Artifact set incomplete, using keyword heuristic");
            Ok(FallbackPredictor::predict(text))
        }
    }
}

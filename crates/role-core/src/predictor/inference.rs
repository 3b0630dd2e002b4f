//! Trained-model inference
//!
//! Runs vectorizer -> classifier -> label decoder and derives a confidence
//! from the classifier's probability estimates when it has any.

use crate::artifacts::CompleteArtifacts;
use crate::error::PredictError;
use crate::models::{EncodedLabel, PredictionResult};
use std::time::Instant;
use tracing::{debug, warn};

/// Maximum inference latency before warning (5ms target)
const MAX_INFERENCE_MS: u128 = 5;

/// Predictor backed by a complete artifact set
pub struct TrainedPredictor<'a> {
    artifacts: CompleteArtifacts<'a>,
}

impl<'a> TrainedPredictor<'a> {
    pub fn new(artifacts: CompleteArtifacts<'a>) -> Self {
        Self { artifacts }
    }

    pub fn predict(&self, text: &str) -> Result<PredictionResult, PredictError> {
        let start = Instant::now();

        let features = self.artifacts.vectorizer.transform(text)?;
        let classifier = self.artifacts.classifier;
        let label = classifier.predict(&features)?;

        let confidence = match classifier.predict_proba(&features) {
            Some(proba) => confidence_for_label(classifier.classes(), label, &proba?),
            None => None,
        };

        let role = self.artifacts.label_decoder.inverse_transform(label)?;

        let elapsed = start.elapsed();
        if elapsed.as_millis() > MAX_INFERENCE_MS {
            warn!(
                elapsed_ms = elapsed.as_millis(),
                "Inference exceeded {}ms target", MAX_INFERENCE_MS
            );
        } else {
            debug!(elapsed_us = elapsed.as_micros(), label, role = %role, "Inference completed");
        }

        Ok(PredictionResult::new(role, confidence))
    }
}

/// Probability of the predicted label.
///
/// Looks up the label's position among the classifier's classes. If the label
/// is not among them, or the position is outside the probability vector, the
/// maximum probability is used instead. `None` only for an empty vector.
pub fn confidence_for_label(
    classes: &[EncodedLabel],
    label: EncodedLabel,
    proba: &[f64],
) -> Option<f64> {
    let lookup = classes
        .iter()
        .position(|c| *c == label)
        .and_then(|index| proba.get(index).copied());

    match lookup {
        Some(p) => Some(p),
        None => {
            debug!(label, classes = classes.len(), "Class lookup failed, using max probability");
            max_probability(proba)
        }
    }
}

fn max_probability(proba: &[f64]) -> Option<f64> {
    proba.iter().copied().reduce(f64::max)
}

//! Health and readiness reporting
//!
//! Both are derived from the artifact set at request time; nothing is stored.

use crate::artifacts::{ArtifactKind, ArtifactSet};
use serde::{Deserialize, Serialize};

/// Artifact presence as reported by the health operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    /// Always "ok"; missing artifacts never fail a health query
    pub status: String,
    pub vectorizer: bool,
    pub classifier: bool,
    pub label_decoder: bool,
}

impl HealthStatus {
    pub fn from_artifacts(artifacts: &ArtifactSet) -> Self {
        Self {
            status: "ok".to_string(),
            vectorizer: artifacts.has_vectorizer(),
            classifier: artifacts.has_classifier(),
            label_decoder: artifacts.has_label_decoder(),
        }
    }

    pub fn all_loaded(&self) -> bool {
        self.vectorizer && self.classifier && self.label_decoder
    }
}

/// Readiness response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ReadinessResponse {
    /// Ready when trained inference is possible, or when the caller accepts
    /// heuristic answers for incomplete artifact sets
    pub fn evaluate(artifacts: &ArtifactSet, allow_heuristic: bool) -> Self {
        if artifacts.is_complete() {
            return Self {
                ready: true,
                reason: None,
            };
        }

        let missing: Vec<&str> = artifacts
            .missing()
            .iter()
            .map(ArtifactKind::file_name)
            .collect();

        if allow_heuristic {
            Self {
                ready: true,
                reason: Some(format!(
                    "Serving keyword heuristics, missing {}",
                    missing.join(", ")
                )),
            }
        } else {
            Self {
                ready: false,
                reason: Some(format!("Artifacts not loaded: {}", missing.join(", "))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::LabelEncoder;

    #[test]
    fn test_health_with_no_artifacts() {
        let health = ArtifactSet::empty().health();

        assert_eq!(health.status, "ok");
        assert!(!health.vectorizer);
        assert!(!health.classifier);
        assert!(!health.label_decoder);
        assert!(!health.all_loaded());
    }

    #[test]
    fn test_health_serializes_camel_case() {
        let set = ArtifactSet::empty().with_label_decoder(LabelEncoder::fit(&["HR"]));
        let json = serde_json::to_value(set.health()).unwrap();

        assert_eq!(json["status"], "ok");
        assert_eq!(json["vectorizer"], false);
        assert_eq!(json["classifier"], false);
        assert_eq!(json["labelDecoder"], true);
    }

    #[test]
    fn test_readiness_not_ready_when_incomplete() {
        let readiness = ReadinessResponse::evaluate(&ArtifactSet::empty(), false);

        assert!(!readiness.ready);
        let reason = readiness.reason.unwrap();
        assert!(reason.contains("tfidf.json"));
        assert!(reason.contains("resumeclassifier.json"));
        assert!(reason.contains("label_encoder.json"));
    }

    #[test]
    fn test_readiness_with_heuristic_allowed() {
        let readiness = ReadinessResponse::evaluate(&ArtifactSet::empty(), true);

        assert!(readiness.ready);
        assert!(readiness.reason.is_some());
    }
}

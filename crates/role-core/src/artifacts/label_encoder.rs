//! Label encoder: encoded class index <-> role name

use super::store::LoadableArtifact;
use super::LabelDecoder;
use crate::error::PredictError;
use crate::models::EncodedLabel;
use serde::{Deserialize, Serialize};

/// Sorted role names; label `i` decodes to `classes[i]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    pub classes: Vec<String>,
}

impl LabelEncoder {
    pub fn new(classes: Vec<String>) -> Self {
        Self { classes }
    }

    /// Fit an encoder on role names; classes are sorted and deduplicated
    pub fn fit<S: AsRef<str>>(roles: &[S]) -> Self {
        let mut classes: Vec<String> = roles.iter().map(|r| r.as_ref().to_string()).collect();
        classes.sort();
        classes.dedup();
        Self { classes }
    }

    /// Encode a role name, if it was seen during fitting
    pub fn transform(&self, role: &str) -> Option<EncodedLabel> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(role))
            .ok()
            .map(|i| i as EncodedLabel)
    }
}

impl LabelDecoder for LabelEncoder {
    fn inverse_transform(&self, label: EncodedLabel) -> Result<String, PredictError> {
        usize::try_from(label)
            .ok()
            .and_then(|i| self.classes.get(i))
            .cloned()
            .ok_or(PredictError::UnknownLabel(label))
    }
}

impl LoadableArtifact for LabelEncoder {
    fn validate(&self) -> Result<(), String> {
        if self.classes.is_empty() {
            return Err("label encoder has no classes".to_string());
        }
        Ok(())
    }
}

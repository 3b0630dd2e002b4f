//! Trained artifacts and the set they are loaded into
//!
//! The prediction pipeline needs three artifacts: a vectorizer that turns
//! text into features, a classifier that maps features to an encoded label,
//! and a label decoder that maps the label back to a role name. Each slot is
//! optional; the set is only usable for trained inference when all three are
//! present.

mod label_encoder;
mod linear;
mod store;
mod tfidf;

pub use label_encoder::LabelEncoder;
pub use linear::{LinearClassifier, LinearKind};
pub use store::{
    resolve_artifacts_dir, ArtifactStore, ARTIFACTS_DIR_ENV, CLASSIFIER_FILE, LABEL_ENCODER_FILE,
    VECTORIZER_FILE,
};
pub use tfidf::{Norm, TfidfVectorizer};

use crate::error::PredictError;
use crate::health::HealthStatus;
use crate::models::EncodedLabel;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Converts raw text into a fixed-width feature vector
pub trait Vectorizer: Send + Sync {
    fn transform(&self, text: &str) -> Result<Vec<f64>, PredictError>;
}

/// Maps a feature vector to an encoded label
pub trait Classifier: Send + Sync {
    fn predict(&self, features: &[f64]) -> Result<EncodedLabel, PredictError>;

    /// Per-class probabilities, ordered like [`Classifier::classes`].
    ///
    /// Returns `None` when the classifier cannot estimate probabilities.
    fn predict_proba(&self, features: &[f64]) -> Option<Result<Vec<f64>, PredictError>>;

    /// Encoded labels known to the classifier
    fn classes(&self) -> &[EncodedLabel];
}

/// Maps an encoded label back to its role name
pub trait LabelDecoder: Send + Sync {
    fn inverse_transform(&self, label: EncodedLabel) -> Result<String, PredictError>;
}

/// Logical artifact slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Vectorizer,
    Classifier,
    LabelDecoder,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 3] = [
        ArtifactKind::Vectorizer,
        ArtifactKind::Classifier,
        ArtifactKind::LabelDecoder,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Vectorizer => "vectorizer",
            ArtifactKind::Classifier => "classifier",
            ArtifactKind::LabelDecoder => "label_decoder",
        }
    }

    /// File name under the artifacts directory
    pub fn file_name(&self) -> &'static str {
        match self {
            ArtifactKind::Vectorizer => VECTORIZER_FILE,
            ArtifactKind::Classifier => CLASSIFIER_FILE,
            ArtifactKind::LabelDecoder => LABEL_ENCODER_FILE,
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a loaded artifact came from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactSource {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub size_bytes: u64,
    pub sha256: String,
    pub loaded_at: i64,
}

/// Loaded artifacts, immutable once constructed.
///
/// Built once at startup and shared behind an `Arc`; every trait object is
/// `Send + Sync` and only takes `&self`, so no locking is needed.
#[derive(Clone, Default)]
pub struct ArtifactSet {
    vectorizer: Option<Arc<dyn Vectorizer>>,
    classifier: Option<Arc<dyn Classifier>>,
    label_decoder: Option<Arc<dyn LabelDecoder>>,
    sources: Vec<ArtifactSource>,
}

/// Borrowed view of a set with every slot filled
pub struct CompleteArtifacts<'a> {
    pub vectorizer: &'a dyn Vectorizer,
    pub classifier: &'a dyn Classifier,
    pub label_decoder: &'a dyn LabelDecoder,
}

impl ArtifactSet {
    /// A set with no artifacts loaded
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_vectorizer(mut self, vectorizer: impl Vectorizer + 'static) -> Self {
        self.vectorizer = Some(Arc::new(vectorizer));
        self
    }

    pub fn with_classifier(mut self, classifier: impl Classifier + 'static) -> Self {
        self.classifier = Some(Arc::new(classifier));
        self
    }

    pub fn with_label_decoder(mut self, label_decoder: impl LabelDecoder + 'static) -> Self {
        self.label_decoder = Some(Arc::new(label_decoder));
        self
    }

    pub(crate) fn with_source(mut self, source: ArtifactSource) -> Self {
        self.sources.push(source);
        self
    }

    pub fn has_vectorizer(&self) -> bool {
        self.vectorizer.is_some()
    }

    pub fn has_classifier(&self) -> bool {
        self.classifier.is_some()
    }

    pub fn has_label_decoder(&self) -> bool {
        self.label_decoder.is_some()
    }

    pub fn is_loaded(&self, kind: ArtifactKind) -> bool {
        match kind {
            ArtifactKind::Vectorizer => self.has_vectorizer(),
            ArtifactKind::Classifier => self.has_classifier(),
            ArtifactKind::LabelDecoder => self.has_label_decoder(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.complete().is_some()
    }

    /// All three artifacts, or `None` if any slot is empty
    pub fn complete(&self) -> Option<CompleteArtifacts<'_>> {
        Some(CompleteArtifacts {
            vectorizer: self.vectorizer.as_deref()?,
            classifier: self.classifier.as_deref()?,
            label_decoder: self.label_decoder.as_deref()?,
        })
    }

    /// Slots that are still empty
    pub fn missing(&self) -> Vec<ArtifactKind> {
        ArtifactKind::ALL
            .into_iter()
            .filter(|kind| !self.is_loaded(*kind))
            .collect()
    }

    /// Files the set was loaded from; empty for sets built in memory
    pub fn sources(&self) -> &[ArtifactSource] {
        &self.sources
    }

    pub fn source(&self, kind: ArtifactKind) -> Option<&ArtifactSource> {
        self.sources.iter().find(|s| s.kind == kind)
    }

    pub fn health(&self) -> HealthStatus {
        HealthStatus::from_artifacts(self)
    }
}

impl fmt::Debug for ArtifactSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtifactSet")
            .field("vectorizer", &self.has_vectorizer())
            .field("classifier", &self.has_classifier())
            .field("label_decoder", &self.has_label_decoder())
            .field("sources", &self.sources.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoder() -> LabelEncoder {
        LabelEncoder::new(vec!["Backend".to_string(), "Frontend".to_string()])
    }

    #[test]
    fn test_empty_set_is_incomplete() {
        let set = ArtifactSet::empty();

        assert!(!set.is_complete());
        assert_eq!(set.missing(), ArtifactKind::ALL.to_vec());
        assert!(set.sources().is_empty());
    }

    #[test]
    fn test_partial_set_reports_missing_slots() {
        let set = ArtifactSet::empty().with_label_decoder(encoder());

        assert!(set.has_label_decoder());
        assert!(!set.is_complete());
        assert_eq!(
            set.missing(),
            vec![ArtifactKind::Vectorizer, ArtifactKind::Classifier]
        );
    }

    #[test]
    fn test_artifact_kind_file_names() {
        assert_eq!(ArtifactKind::Vectorizer.file_name(), "tfidf.json");
        assert_eq!(ArtifactKind::Classifier.file_name(), "resumeclassifier.json");
        assert_eq!(ArtifactKind::LabelDecoder.file_name(), "label_encoder.json");
    }
}

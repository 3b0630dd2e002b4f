//! Artifact store: resolves the artifacts directory and loads whatever is there
//!
//! Absence of a file is an expected state and leaves the slot empty. A file
//! that exists but cannot be read, parsed or validated is an error, so a
//! corrupt artifact never masquerades as a missing one.

use super::{
    ArtifactKind, ArtifactSet, ArtifactSource, LabelEncoder, LinearClassifier, TfidfVectorizer,
};
use crate::error::ArtifactError;
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable overriding the artifacts directory
pub const ARTIFACTS_DIR_ENV: &str = "ARTIFACTS_DIR";

pub const VECTORIZER_FILE: &str = "tfidf.json";
pub const CLASSIFIER_FILE: &str = "resumeclassifier.json";
pub const LABEL_ENCODER_FILE: &str = "label_encoder.json";

/// Default directory name next to the service executable
const DEFAULT_DIR_NAME: &str = "artifacts";

/// Resolve the artifacts directory.
///
/// An explicit, non-empty override wins. Otherwise the directory is
/// `artifacts/` next to the running executable, or `./artifacts` if the
/// executable path is unavailable.
pub fn resolve_artifacts_dir(override_dir: Option<&Path>) -> PathBuf {
    if let Some(dir) = override_dir.filter(|d| !d.as_os_str().is_empty()) {
        return dir.to_path_buf();
    }

    match std::env::current_exe() {
        Ok(exe) => exe
            .parent()
            .map(|p| p.join(DEFAULT_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DIR_NAME)),
        Err(e) => {
            warn!(error = %e, "Cannot determine executable path, using ./{}", DEFAULT_DIR_NAME);
            PathBuf::from(DEFAULT_DIR_NAME)
        }
    }
}

/// Artifact formats that can be checked after deserialization
pub(crate) trait LoadableArtifact: DeserializeOwned {
    fn validate(&self) -> Result<(), String>;
}

/// Loads the three named artifacts from a directory
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    base_dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn path_for(&self, kind: ArtifactKind) -> PathBuf {
        self.base_dir.join(kind.file_name())
    }

    /// Load every artifact present under the base directory
    pub fn load(&self) -> Result<ArtifactSet, ArtifactError> {
        let mut set = ArtifactSet::empty();

        // Nothing can exist beneath a regular file
        if self.base_dir.is_file() {
            warn!(
                dir = %self.base_dir.display(),
                "Artifacts path is a file, no artifacts loaded"
            );
            return Ok(set);
        }

        if let Some((vectorizer, source)) =
            self.load_one::<TfidfVectorizer>(ArtifactKind::Vectorizer)?
        {
            set = set.with_vectorizer(vectorizer).with_source(source);
        }
        if let Some((classifier, source)) =
            self.load_one::<LinearClassifier>(ArtifactKind::Classifier)?
        {
            set = set.with_classifier(classifier).with_source(source);
        }
        if let Some((encoder, source)) = self.load_one::<LabelEncoder>(ArtifactKind::LabelDecoder)? {
            set = set.with_label_decoder(encoder).with_source(source);
        }

        info!(
            dir = %self.base_dir.display(),
            vectorizer = set.has_vectorizer(),
            classifier = set.has_classifier(),
            label_decoder = set.has_label_decoder(),
            complete = set.is_complete(),
            "Artifact loading finished"
        );

        Ok(set)
    }

    fn load_one<T: LoadableArtifact>(
        &self,
        kind: ArtifactKind,
    ) -> Result<Option<(T, ArtifactSource)>, ArtifactError> {
        let path = self.path_for(kind);

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(artifact = %kind, path = %path.display(), "Artifact not present");
                return Ok(None);
            }
            Err(source) => return Err(ArtifactError::Io { kind, path, source }),
        };

        let artifact: T = serde_json::from_slice(&bytes).map_err(|e| ArtifactError::Corrupt {
            kind,
            path: path.clone(),
            reason: e.to_string(),
        })?;
        artifact.validate().map_err(|reason| ArtifactError::Corrupt {
            kind,
            path: path.clone(),
            reason,
        })?;

        let source = ArtifactSource {
            kind,
            size_bytes: bytes.len() as u64,
            sha256: compute_checksum(&bytes),
            loaded_at: chrono::Utc::now().timestamp(),
            path,
        };

        info!(
            artifact = %kind,
            path = %source.path.display(),
            size = source.size_bytes,
            sha256 = %source.sha256,
            "Artifact loaded"
        );

        Ok(Some((artifact, source)))
    }
}

/// Compute SHA256 checksum of data
pub fn compute_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const VECTORIZER_JSON: &str = r#"{"vocabulary": {"rust": 0, "react": 1}, "idf": [1.0, 1.5]}"#;
    const CLASSIFIER_JSON: &str = r#"{
        "kind": "logistic_regression",
        "classes": [0, 1],
        "coef": [[2.0, -2.0]],
        "intercept": [0.0]
    }"#;
    const ENCODER_JSON: &str = r#"{"classes": ["Backend Engineer", "Frontend Engineer"]}"#;

    fn write(dir: &TempDir, name: &str, contents: &str) {
        fs::write(dir.path().join(name), contents).unwrap();
    }

    #[test]
    fn test_load_empty_directory() {
        let dir = TempDir::new().unwrap();
        let set = ArtifactStore::new(dir.path()).load().unwrap();

        assert!(!set.has_vectorizer());
        assert!(!set.has_classifier());
        assert!(!set.has_label_decoder());
        assert!(set.sources().is_empty());
    }

    #[test]
    fn test_load_nonexistent_directory_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path().join("does-not-exist"));

        let set = store.load().unwrap();
        assert!(!set.is_complete());
    }

    #[test]
    fn test_load_from_regular_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("notadir");
        fs::write(&file, "plain file").unwrap();

        let set = ArtifactStore::new(&file).load().unwrap();
        assert_eq!(set.missing().len(), 3);
        assert!(set.sources().is_empty());
    }

    #[test]
    fn test_load_partial_set() {
        let dir = TempDir::new().unwrap();
        write(&dir, VECTORIZER_FILE, VECTORIZER_JSON);
        write(&dir, LABEL_ENCODER_FILE, ENCODER_JSON);

        let set = ArtifactStore::new(dir.path()).load().unwrap();

        assert!(set.has_vectorizer());
        assert!(!set.has_classifier());
        assert!(set.has_label_decoder());
        assert_eq!(set.missing(), vec![ArtifactKind::Classifier]);
        assert_eq!(set.sources().len(), 2);
    }

    #[test]
    fn test_load_complete_set_records_sources() {
        let dir = TempDir::new().unwrap();
        write(&dir, VECTORIZER_FILE, VECTORIZER_JSON);
        write(&dir, CLASSIFIER_FILE, CLASSIFIER_JSON);
        write(&dir, LABEL_ENCODER_FILE, ENCODER_JSON);

        let set = ArtifactStore::new(dir.path()).load().unwrap();
        assert!(set.is_complete());

        let source = set.source(ArtifactKind::LabelDecoder).unwrap();
        assert_eq!(source.path, dir.path().join(LABEL_ENCODER_FILE));
        assert_eq!(source.size_bytes, ENCODER_JSON.len() as u64);
        assert_eq!(source.sha256, compute_checksum(ENCODER_JSON.as_bytes()));
    }

    #[test]
    fn test_unparseable_artifact_is_corrupt() {
        let dir = TempDir::new().unwrap();
        write(&dir, CLASSIFIER_FILE, "\u{80}not json at all");

        let err = ArtifactStore::new(dir.path()).load().unwrap_err();
        assert!(matches!(err, ArtifactError::Corrupt { .. }));
        assert_eq!(err.kind(), ArtifactKind::Classifier);
    }

    #[test]
    fn test_invalid_artifact_is_corrupt() {
        let dir = TempDir::new().unwrap();
        // idf length disagrees with vocabulary size
        write(&dir, VECTORIZER_FILE, r#"{"vocabulary": {"rust": 0}, "idf": []}"#);

        let err = ArtifactStore::new(dir.path()).load().unwrap_err();
        match err {
            ArtifactError::Corrupt { kind, reason, .. } => {
                assert_eq!(kind, ArtifactKind::Vectorizer);
                assert!(reason.contains("idf"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_resolve_prefers_override() {
        let dir = resolve_artifacts_dir(Some(Path::new("/srv/models")));
        assert_eq!(dir, PathBuf::from("/srv/models"));
    }

    #[test]
    fn test_resolve_ignores_empty_override() {
        let dir = resolve_artifacts_dir(Some(Path::new("")));
        assert!(dir.ends_with(DEFAULT_DIR_NAME));
    }

    #[test]
    fn test_compute_checksum() {
        let checksum = compute_checksum(b"hello world");
        assert_eq!(
            checksum,
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }
}

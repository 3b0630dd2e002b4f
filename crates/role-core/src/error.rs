//! Error types for artifact loading and prediction

use crate::artifacts::ArtifactKind;
use crate::models::EncodedLabel;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to load an artifact that is present on disk.
///
/// A missing file is not an error; the slot simply stays empty.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to read {kind} artifact at {path}: {source}")]
    Io {
        kind: ArtifactKind,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{kind} artifact at {path} is corrupt: {reason}")]
    Corrupt {
        kind: ArtifactKind,
        path: PathBuf,
        reason: String,
    },
}

impl ArtifactError {
    pub fn kind(&self) -> ArtifactKind {
        match self {
            ArtifactError::Io { kind, .. } | ArtifactError::Corrupt { kind, .. } => *kind,
        }
    }
}

/// Failure inside the trained prediction pipeline
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PredictError {
    #[error("feature vector has {actual} columns, classifier expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("encoded label {0} is not known to the label decoder")]
    UnknownLabel(EncodedLabel),

    #[error("invalid artifact state: {0}")]
    InvalidArtifact(String),
}

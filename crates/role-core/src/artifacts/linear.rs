//! Linear classifiers over TF-IDF features
//!
//! Decision values are `coef · x + intercept` per row. A binary model stores
//! a single row; a multi-class model stores one row per class.

use super::store::LoadableArtifact;
use super::Classifier;
use crate::error::PredictError;
use crate::models::EncodedLabel;
use serde::{Deserialize, Serialize};

/// Model family, which decides whether probabilities are available
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinearKind {
    /// Logistic regression, exposes calibrated probabilities
    LogisticRegression,
    /// Linear support vector classifier, decision values only
    LinearSvc,
}

/// Fitted linear classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearClassifier {
    pub kind: LinearKind,
    pub classes: Vec<EncodedLabel>,
    pub coef: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
}

impl LinearClassifier {
    pub fn new(
        kind: LinearKind,
        classes: Vec<EncodedLabel>,
        coef: Vec<Vec<f64>>,
        intercept: Vec<f64>,
    ) -> Self {
        Self {
            kind,
            classes,
            coef,
            intercept,
        }
    }

    fn is_binary(&self) -> bool {
        self.coef.len() == 1
    }

    /// Expected feature width
    pub fn num_features(&self) -> usize {
        self.coef.first().map(Vec::len).unwrap_or(0)
    }

    fn decision_function(&self, features: &[f64]) -> Result<Vec<f64>, PredictError> {
        let expected = self.num_features();
        if features.len() != expected {
            return Err(PredictError::DimensionMismatch {
                expected,
                actual: features.len(),
            });
        }
        if self.intercept.len() != self.coef.len() {
            return Err(PredictError::InvalidArtifact(format!(
                "intercept has {} values for {} coef rows",
                self.intercept.len(),
                self.coef.len()
            )));
        }

        Ok(self
            .coef
            .iter()
            .zip(&self.intercept)
            .map(|(row, bias)| row.iter().zip(features).map(|(w, x)| w * x).sum::<f64>() + bias)
            .collect())
    }

    fn class_at(&self, index: usize) -> Result<EncodedLabel, PredictError> {
        self.classes.get(index).copied().ok_or_else(|| {
            PredictError::InvalidArtifact(format!(
                "class index {index} outside {} known classes",
                self.classes.len()
            ))
        })
    }
}

impl Classifier for LinearClassifier {
    fn predict(&self, features: &[f64]) -> Result<EncodedLabel, PredictError> {
        let scores = self.decision_function(features)?;

        if self.is_binary() {
            let index = if scores[0] > 0.0 { 1 } else { 0 };
            return self.class_at(index);
        }

        let best = argmax(&scores)
            .ok_or_else(|| PredictError::InvalidArtifact("classifier has no rows".to_string()))?;
        self.class_at(best)
    }

    fn predict_proba(&self, features: &[f64]) -> Option<Result<Vec<f64>, PredictError>> {
        if self.kind != LinearKind::LogisticRegression {
            return None;
        }

        Some(self.decision_function(features).map(|scores| {
            if self.is_binary() {
                let p = sigmoid(scores[0]);
                vec![1.0 - p, p]
            } else {
                softmax(&scores)
            }
        }))
    }

    fn classes(&self) -> &[EncodedLabel] {
        &self.classes
    }
}

impl LoadableArtifact for LinearClassifier {
    fn validate(&self) -> Result<(), String> {
        if self.classes.len() < 2 {
            return Err(format!("need at least 2 classes, found {}", self.classes.len()));
        }

        let rows = self.coef.len();
        let binary = self.classes.len() == 2 && rows == 1;
        if !binary && rows != self.classes.len() {
            return Err(format!(
                "coef has {rows} rows for {} classes",
                self.classes.len()
            ));
        }
        if self.intercept.len() != rows {
            return Err(format!(
                "intercept has {} values for {rows} coef rows",
                self.intercept.len()
            ));
        }

        let width = self.num_features();
        if self.coef.iter().any(|row| row.len() != width) {
            return Err("coef rows have differing widths".to_string());
        }

        Ok(())
    }
}

fn argmax(values: &[f64]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary(kind: LinearKind) -> LinearClassifier {
        LinearClassifier::new(kind, vec![0, 1], vec![vec![2.0, -2.0]], vec![0.0])
    }

    fn three_class() -> LinearClassifier {
        LinearClassifier::new(
            LinearKind::LogisticRegression,
            vec![0, 1, 2],
            vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![-1.0, -1.0]],
            vec![0.0, 0.0, 0.5],
        )
    }

    #[test]
    fn test_binary_predict() {
        let model = binary(LinearKind::LogisticRegression);

        assert_eq!(model.predict(&[0.0, 1.0]).unwrap(), 0);
        assert_eq!(model.predict(&[1.0, 0.0]).unwrap(), 1);
    }

    #[test]
    fn test_binary_probabilities_sum_to_one() {
        let model = binary(LinearKind::LogisticRegression);

        let proba = model.predict_proba(&[1.0, 0.0]).unwrap().unwrap();
        assert_eq!(proba.len(), 2);
        assert!((proba.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert!(proba[1] > proba[0]);
    }

    #[test]
    fn test_multiclass_argmax_and_softmax() {
        let model = three_class();

        assert_eq!(model.predict(&[0.2, 0.9]).unwrap(), 1);

        let proba = model.predict_proba(&[0.2, 0.9]).unwrap().unwrap();
        assert_eq!(proba.len(), 3);
        assert!((proba.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert_eq!(argmax(&proba), Some(1));
    }

    #[test]
    fn test_svc_has_no_probabilities() {
        let model = binary(LinearKind::LinearSvc);

        assert!(model.predict_proba(&[1.0, 0.0]).is_none());
        assert_eq!(model.predict(&[1.0, 0.0]).unwrap(), 1);
    }

    #[test]
    fn test_dimension_mismatch() {
        let model = binary(LinearKind::LogisticRegression);

        let err = model.predict(&[1.0, 0.0, 3.0]).unwrap_err();
        assert_eq!(
            err,
            PredictError::DimensionMismatch {
                expected: 2,
                actual: 3
            }
        );
    }

    #[test]
    fn test_mismatched_intercept_is_an_error() {
        for kind in [LinearKind::LinearSvc, LinearKind::LogisticRegression] {
            let model = LinearClassifier::new(kind, vec![0, 1], vec![vec![1.0]], vec![]);

            let err = model.predict(&[1.0]).unwrap_err();
            assert!(matches!(err, PredictError::InvalidArtifact(_)));
        }

        let model = LinearClassifier::new(
            LinearKind::LogisticRegression,
            vec![0, 1],
            vec![vec![1.0]],
            vec![],
        );
        let proba = model.predict_proba(&[1.0]).unwrap();
        assert!(matches!(proba, Err(PredictError::InvalidArtifact(_))));
    }

    #[test]
    fn test_validate() {
        assert!(binary(LinearKind::LinearSvc).validate().is_ok());
        assert!(three_class().validate().is_ok());

        let mut ragged = three_class();
        ragged.coef[2].push(1.0);
        assert!(ragged.validate().is_err());

        let mut short_intercept = three_class();
        short_intercept.intercept.pop();
        assert!(short_intercept.validate().is_err());

        let single = LinearClassifier::new(LinearKind::LinearSvc, vec![0], vec![vec![1.0]], vec![0.0]);
        assert!(single.validate().is_err());
    }

    #[test]
    fn test_argmax_prefers_first_on_ties() {
        assert_eq!(argmax(&[0.5, 0.5, 0.1]), Some(0));
        assert_eq!(argmax(&[]), None);
    }
}

//! TF-IDF text vectorizer
//!
//! Mirrors the usual term-frequency × inverse-document-frequency transform:
//! word tokens of two or more characters, optional n-grams, optional
//! sublinear term frequency, and L2 row normalization.

use super::store::LoadableArtifact;
use super::Vectorizer;
use crate::error::PredictError;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Row normalization applied after weighting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    #[default]
    L2,
    None,
}

fn default_lowercase() -> bool {
    true
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

/// Fitted TF-IDF vectorizer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    /// Term -> column index
    pub vocabulary: HashMap<String, usize>,
    /// Inverse document frequency per column
    pub idf: Vec<f64>,
    #[serde(default = "default_lowercase")]
    pub lowercase: bool,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    #[serde(default)]
    pub sublinear_tf: bool,
    #[serde(default)]
    pub norm: Norm,
}

impl TfidfVectorizer {
    /// Vectorizer with default options over the given vocabulary
    pub fn new(vocabulary: HashMap<String, usize>, idf: Vec<f64>) -> Self {
        Self {
            vocabulary,
            idf,
            lowercase: default_lowercase(),
            ngram_range: default_ngram_range(),
            sublinear_tf: false,
            norm: Norm::L2,
        }
    }

    /// Number of output columns
    pub fn num_features(&self) -> usize {
        self.idf.len()
    }

    /// Split text into word tokens and the configured n-grams
    fn analyze(&self, text: &str) -> Vec<String> {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        let words: Vec<&str> = text
            .split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .filter(|w| w.chars().count() >= 2)
            .collect();

        let (min_n, max_n) = self.ngram_range;
        let mut terms = Vec::new();
        for n in min_n..=max_n {
            if n == 0 || n > words.len() {
                continue;
            }
            for window in words.windows(n) {
                terms.push(window.join(" "));
            }
        }
        terms
    }
}

impl Vectorizer for TfidfVectorizer {
    fn transform(&self, text: &str) -> Result<Vec<f64>, PredictError> {
        let mut features = vec![0.0_f64; self.num_features()];

        for term in self.analyze(text) {
            if let Some(&idx) = self.vocabulary.get(&term) {
                let slot = features.get_mut(idx).ok_or_else(|| {
                    PredictError::InvalidArtifact(format!(
                        "vocabulary column {idx} outside {} idf weights",
                        self.idf.len()
                    ))
                })?;
                *slot += 1.0;
            }
        }

        for (count, idf) in features.iter_mut().zip(&self.idf) {
            if *count > 0.0 {
                let tf = if self.sublinear_tf {
                    1.0 + count.ln()
                } else {
                    *count
                };
                *count = tf * idf;
            }
        }

        if self.norm == Norm::L2 {
            let norm = features.iter().map(|v| v * v).sum::<f64>().sqrt();
            if norm > 0.0 {
                features.iter_mut().for_each(|v| *v /= norm);
            }
        }

        Ok(features)
    }
}

impl LoadableArtifact for TfidfVectorizer {
    fn validate(&self) -> Result<(), String> {
        if self.idf.len() != self.vocabulary.len() {
            return Err(format!(
                "idf has {} weights for a vocabulary of {} terms",
                self.idf.len(),
                self.vocabulary.len()
            ));
        }

        let mut seen = HashSet::with_capacity(self.vocabulary.len());
        for (term, &idx) in &self.vocabulary {
            if idx >= self.idf.len() {
                return Err(format!("term '{term}' maps to column {idx}, out of range"));
            }
            if !seen.insert(idx) {
                return Err(format!("column {idx} is assigned to more than one term"));
            }
        }

        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(format!("invalid ngram_range ({min_n}, {max_n})"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab(terms: &[&str]) -> HashMap<String, usize> {
        terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.to_string(), i))
            .collect()
    }

    #[test]
    fn test_transform_counts_known_terms() {
        let mut vectorizer = TfidfVectorizer::new(vocab(&["rust", "react"]), vec![1.0, 2.0]);
        vectorizer.norm = Norm::None;

        let features = vectorizer.transform("Rust, rust and React!").unwrap();
        assert_eq!(features, vec![2.0, 2.0]);
    }

    #[test]
    fn test_transform_l2_normalizes() {
        let vectorizer = TfidfVectorizer::new(vocab(&["rust", "react"]), vec![1.0, 1.0]);

        let features = vectorizer.transform("rust react").unwrap();
        let norm: f64 = features.iter().map(|v| v * v).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_text_yields_zero_vector() {
        let vectorizer = TfidfVectorizer::new(vocab(&["rust"]), vec![1.0]);

        let features = vectorizer.transform("nothing relevant here").unwrap();
        assert_eq!(features, vec![0.0]);
    }

    #[test]
    fn test_single_character_tokens_are_ignored() {
        let mut vectorizer = TfidfVectorizer::new(vocab(&["c", "go"]), vec![1.0, 1.0]);
        vectorizer.norm = Norm::None;

        let features = vectorizer.transform("C and Go").unwrap();
        assert_eq!(features, vec![0.0, 1.0]);
    }

    #[test]
    fn test_bigrams() {
        let mut vectorizer =
            TfidfVectorizer::new(vocab(&["machine", "machine learning"]), vec![1.0, 3.0]);
        vectorizer.ngram_range = (1, 2);
        vectorizer.norm = Norm::None;

        let features = vectorizer.transform("Machine Learning engineer").unwrap();
        assert_eq!(features, vec![1.0, 3.0]);
    }

    #[test]
    fn test_sublinear_tf() {
        let mut vectorizer = TfidfVectorizer::new(vocab(&["rust"]), vec![1.0]);
        vectorizer.sublinear_tf = true;
        vectorizer.norm = Norm::None;

        let features = vectorizer.transform("rust rust rust").unwrap();
        assert!((features[0] - (1.0 + 3f64.ln())).abs() < 1e-9);
    }

    #[test]
    fn test_validate_rejects_duplicate_columns() {
        let mut vocabulary = vocab(&["rust"]);
        vocabulary.insert("go".to_string(), 0);
        let vectorizer = TfidfVectorizer::new(vocabulary, vec![1.0, 1.0]);

        assert!(vectorizer.validate().is_err());
    }

    #[test]
    fn test_deserialize_defaults() {
        let vectorizer: TfidfVectorizer =
            serde_json::from_str(r#"{"vocabulary": {"rust": 0}, "idf": [1.0]}"#).unwrap();

        assert!(vectorizer.lowercase);
        assert_eq!(vectorizer.ngram_range, (1, 1));
        assert_eq!(vectorizer.norm, Norm::L2);
        assert!(vectorizer.validate().is_ok());
    }
}

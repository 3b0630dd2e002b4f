//! Keyword heuristic used when trained artifacts are unavailable

use crate::models::PredictionResult;

/// One ordered keyword rule
#[derive(Debug, Clone, Copy)]
pub struct KeywordRule {
    pub role: &'static str,
    pub confidence: f64,
    pub keywords: &'static [&'static str],
}

impl KeywordRule {
    /// Substring match against already lower-cased text
    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k))
    }
}

/// Rules in evaluation order; the first match wins
pub const KEYWORD_RULES: [KeywordRule; 3] = [
    KeywordRule {
        role: "Data Scientist",
        confidence: 0.70,
        keywords: &["pandas", "numpy", "sklearn", "regression", "ml"],
    },
    KeywordRule {
        role: "Software Engineer",
        confidence: 0.65,
        keywords: &[
            "react",
            "node",
            "javascript",
            "typescript",
            "frontend",
            "backend",
        ],
    },
    KeywordRule {
        role: "DevOps Engineer",
        confidence: 0.68,
        keywords: &["aws", "docker", "kubernetes", "ci/cd", "terraform", "devops"],
    },
];

pub const GENERAL_ROLE: &str = "General";
pub const GENERAL_CONFIDENCE: f64 = 0.50;

/// Deterministic keyword classifier
pub struct FallbackPredictor;

impl FallbackPredictor {
    pub fn predict(text: &str) -> PredictionResult {
        let lowered = text.to_lowercase();

        KEYWORD_RULES
            .iter()
            .find(|rule| rule.matches(&lowered))
            .map(|rule| PredictionResult::new(rule.role, Some(rule.confidence)))
            .unwrap_or_else(|| PredictionResult::new(GENERAL_ROLE, Some(GENERAL_CONFIDENCE)))
    }
}

//! Predict command, against the service or in process

use anyhow::{bail, Context, Result};
use colored::Colorize;
use role_core::{
    artifacts::resolve_artifacts_dir, select_strategy, ArtifactStore, PredictionResult, Strategy,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::client::ApiClient;
use crate::output::{color_confidence, print_json, print_warning, OutputFormat};

/// Local prediction output, tagged with the strategy that produced it
#[derive(Serialize)]
struct LocalPrediction<'a> {
    #[serde(flatten)]
    result: &'a PredictionResult,
    strategy: Strategy,
}

/// Resolve the text argument or file into non-empty resume text
pub fn read_text(text: Option<String>, file: Option<PathBuf>) -> Result<String> {
    let text = match (text, file) {
        (Some(text), _) => text,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (None, None) => bail!("Provide resume text or --file"),
    };

    if text.trim().is_empty() {
        bail!("text must be non-empty");
    }
    Ok(text)
}

/// Ask the service for a prediction
pub async fn predict_remote(client: &ApiClient, text: &str, format: OutputFormat) -> Result<()> {
    let result = client.predict(text).await?;

    match format {
        OutputFormat::Json => print_json(&result)?,
        OutputFormat::Table => print_prediction(&result, None),
    }

    Ok(())
}

/// Load artifacts from disk and predict without a running service.
///
/// Unlike the service, an incomplete artifact set is not an error here:
/// the keyword heuristic answers and a warning says so.
pub fn predict_local(artifacts_dir: Option<&Path>, text: &str, format: OutputFormat) -> Result<()> {
    let dir = resolve_artifacts_dir(artifacts_dir);
    let artifacts = ArtifactStore::new(&dir)
        .load()
        .with_context(|| format!("Failed to load artifacts from {}", dir.display()))?;

    let strategy = select_strategy(&artifacts);
    let result = role_core::predict(text, &artifacts).context("Prediction failed")?;

    match format {
        OutputFormat::Json => print_json(&LocalPrediction {
            result: &result,
            strategy,
        })?,
        OutputFormat::Table => {
            if strategy == Strategy::Heuristic {
                let missing: Vec<&str> = artifacts
                    .missing()
                    .iter()
                    .map(|kind| kind.file_name())
                    .collect();
                print_warning(&format!(
                    "Heuristic result, missing {} in {}",
                    missing.join(", "),
                    dir.display()
                ));
            }
            print_prediction(&result, Some(strategy));
        }
    }

    Ok(())
}

fn print_prediction(result: &PredictionResult, strategy: Option<Strategy>) {
    println!("Role:       {}", result.role.cyan().bold());
    println!("Confidence: {}", color_confidence(result.confidence));
    if let Some(strategy) = strategy {
        println!("Strategy:   {}", strategy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_text_prefers_argument() {
        let text = read_text(Some("react".to_string()), None).unwrap();
        assert_eq!(text, "react");
    }

    #[test]
    fn test_read_text_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("resume.txt");
        std::fs::write(&path, "Terraform and AWS").unwrap();

        let text = read_text(None, Some(path)).unwrap();
        assert_eq!(text, "Terraform and AWS");
    }

    #[test]
    fn test_read_text_rejects_blank() {
        assert!(read_text(Some("  \n".to_string()), None).is_err());
        assert!(read_text(None, None).is_err());
    }

    #[test]
    fn test_predict_local_with_empty_directory_uses_heuristic() {
        let dir = TempDir::new().unwrap();
        assert!(predict_local(Some(dir.path()), "docker compose", OutputFormat::Json).is_ok());
    }

    #[test]
    fn test_predict_local_fails_on_corrupt_artifact() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(role_core::artifacts::CLASSIFIER_FILE), "{").unwrap();

        assert!(predict_local(Some(dir.path()), "docker", OutputFormat::Table).is_err());
    }
}

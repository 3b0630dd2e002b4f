//! Artifact inspection command

use anyhow::{Context, Result};
use colored::Colorize;
use role_core::{
    artifacts::{resolve_artifacts_dir, ArtifactSource},
    ArtifactKind, ArtifactStore,
};
use serde::Serialize;
use std::path::Path;
use tabled::Tabled;

use crate::output::{
    color_loaded, format_bytes, print_json, print_success, print_warning, OutputFormat,
};

/// Row for the artifacts table
#[derive(Tabled)]
struct ArtifactRow {
    #[tabled(rename = "Artifact")]
    artifact: String,
    #[tabled(rename = "File")]
    file: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "SHA-256")]
    sha256: String,
}

#[derive(Serialize)]
struct ArtifactReport<'a> {
    dir: &'a Path,
    complete: bool,
    missing: Vec<ArtifactKind>,
    sources: &'a [ArtifactSource],
}

/// Load an artifacts directory and report what is there
pub fn inspect_artifacts(artifacts_dir: Option<&Path>, format: OutputFormat) -> Result<()> {
    let dir = resolve_artifacts_dir(artifacts_dir);
    let artifacts = ArtifactStore::new(&dir)
        .load()
        .with_context(|| format!("Failed to load artifacts from {}", dir.display()))?;

    match format {
        OutputFormat::Json => print_json(&ArtifactReport {
            dir: &dir,
            complete: artifacts.is_complete(),
            missing: artifacts.missing(),
            sources: artifacts.sources(),
        })?,
        OutputFormat::Table => {
            println!("{}", "Artifacts".bold());
            println!("{}", "=".repeat(60));
            println!("Directory: {}", dir.display().to_string().cyan());
            println!();

            let rows: Vec<ArtifactRow> = ArtifactKind::ALL
                .iter()
                .map(|kind| {
                    let source = artifacts.source(*kind);
                    ArtifactRow {
                        artifact: kind.to_string(),
                        file: kind.file_name().to_string(),
                        state: color_loaded(artifacts.is_loaded(*kind)),
                        size: source
                            .map(|s| format_bytes(s.size_bytes))
                            .unwrap_or_else(|| "-".to_string()),
                        sha256: source
                            .map(|s| s.sha256.chars().take(12).collect())
                            .unwrap_or_else(|| "-".to_string()),
                    }
                })
                .collect();

            let table = tabled::Table::new(rows)
                .with(tabled::settings::Style::rounded())
                .to_string();
            println!("{}", table);

            if artifacts.is_complete() {
                print_success("All artifacts loaded");
            } else {
                print_warning("Artifact set incomplete; the service will report itself not ready");
            }
        }
    }

    Ok(())
}

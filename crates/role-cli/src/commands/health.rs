//! Service health command

use anyhow::Result;
use colored::Colorize;
use tabled::Tabled;

use crate::client::ApiClient;
use crate::output::{color_loaded, print_json, print_success, print_warning, OutputFormat};

/// Row for the artifact presence table
#[derive(Tabled)]
struct ArtifactRow {
    #[tabled(rename = "Artifact")]
    artifact: String,
    #[tabled(rename = "State")]
    state: String,
}

/// Show artifact presence as reported by the service
pub async fn show_health(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let health = client.health().await?;

    match format {
        OutputFormat::Json => print_json(&health)?,
        OutputFormat::Table => {
            println!("{}", "Service Health".bold());
            println!("{}", "=".repeat(40));
            println!("Status: {}", health.status.green());
            println!();

            let rows = vec![
                ArtifactRow {
                    artifact: "vectorizer".to_string(),
                    state: color_loaded(health.vectorizer),
                },
                ArtifactRow {
                    artifact: "classifier".to_string(),
                    state: color_loaded(health.classifier),
                },
                ArtifactRow {
                    artifact: "label decoder".to_string(),
                    state: color_loaded(health.label_decoder),
                },
            ];
            let table = tabled::Table::new(rows)
                .with(tabled::settings::Style::rounded())
                .to_string();
            println!("{}", table);

            if health.all_loaded() {
                print_success("Trained inference available");
            } else {
                print_warning("Artifacts incomplete; the service will reject predict requests unless heuristics are enabled");
            }
        }
    }

    Ok(())
}

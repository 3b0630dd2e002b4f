//! Resume Role Predictor CLI
//!
//! A command-line tool for checking service health, predicting roles
//! and inspecting trained artifacts.

mod client;
mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{artifacts, health, predict};
use std::path::PathBuf;

/// Resume Role Predictor CLI
#[derive(Parser)]
#[command(name = "rolectl")]
#[command(author, version, about = "CLI for the Resume Role Predictor", long_about = None)]
pub struct Cli {
    /// API endpoint URL (can also be set via ROLE_PREDICTOR_URL env var)
    #[arg(long, env = "ROLE_PREDICTOR_URL", default_value = "http://localhost:8000")]
    pub api_url: String,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show which artifacts the service has loaded
    Health,

    /// Predict the job role for a resume
    Predict {
        /// Resume text
        #[arg(required_unless_present = "file")]
        text: Option<String>,

        /// Read resume text from a file
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Predict in process instead of calling the service
        #[arg(long)]
        local: bool,

        /// Artifacts directory for local prediction
        #[arg(long, env = "ARTIFACTS_DIR")]
        artifacts_dir: Option<PathBuf>,
    },

    /// Inspect an artifacts directory
    Artifacts {
        /// Artifacts directory (defaults to artifacts/ next to the binary)
        #[arg(long, env = "ARTIFACTS_DIR")]
        artifacts_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Health => {
            let client = client::ApiClient::new(&cli.api_url)?;
            health::show_health(&client, cli.format).await?;
        }
        Commands::Predict {
            text,
            file,
            local,
            artifacts_dir,
        } => {
            let text = predict::read_text(text, file)?;
            if local {
                predict::predict_local(artifacts_dir.as_deref(), &text, cli.format)?;
            } else {
                let client = client::ApiClient::new(&cli.api_url)?;
                predict::predict_remote(&client, &text, cli.format).await?;
            }
        }
        Commands::Artifacts { artifacts_dir } => {
            artifacts::inspect_artifacts(artifacts_dir.as_deref(), cli.format)?;
        }
    }

    Ok(())
}

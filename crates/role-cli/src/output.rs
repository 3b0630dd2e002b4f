//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Format bytes as human-readable string
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2}Mi", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2}Ki", bytes as f64 / KB as f64)
    } else {
        format!("{}B", bytes)
    }
}

/// Format confidence as percentage, or "n/a" when the model gives none
pub fn format_confidence(confidence: Option<f64>) -> String {
    match confidence {
        Some(c) => format!("{:.0}%", c * 100.0),
        None => "n/a".to_string(),
    }
}

/// Color confidence based on value
pub fn color_confidence(confidence: Option<f64>) -> String {
    let formatted = format_confidence(confidence);
    match confidence {
        Some(c) if c >= 0.8 => formatted.green().to_string(),
        Some(c) if c >= 0.6 => formatted.yellow().to_string(),
        Some(_) => formatted.red().to_string(),
        None => formatted.dimmed().to_string(),
    }
}

/// Color artifact presence
pub fn color_loaded(loaded: bool) -> String {
    if loaded {
        "loaded".green().to_string()
    } else {
        "missing".red().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_confidence() {
        assert_eq!(format_confidence(Some(0.65)), "65%");
        assert_eq!(format_confidence(Some(1.0)), "100%");
        assert_eq!(format_confidence(None), "n/a");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512B");
        assert_eq!(format_bytes(2048), "2.00Ki");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.00Mi");
    }
}

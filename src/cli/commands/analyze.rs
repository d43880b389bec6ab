//! One-off document analysis from the command line.

use std::path::Path;

use anyhow::Context;
use console::style;

use crate::config::Settings;
use crate::extract;
use crate::llm::{presets, AnalysisClient};

/// Extract `file` and send it to the analysis provider. Nothing is stored.
pub async fn cmd_analyze(
    settings: &Settings,
    file: &Path,
    prompt: &str,
    analysis_type: Option<&str>,
) -> anyhow::Result<()> {
    let filename = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("Not a file: {}", file.display()))?;

    if !extract::is_supported(&filename) {
        anyhow::bail!(
            "Unsupported file type: {} (expected one of: {})",
            filename,
            extract::SUPPORTED_EXTENSIONS.join(", ")
        );
    }

    if let Some(key) = analysis_type {
        if presets::find(key).is_none() {
            println!(
                "{} Unknown preset '{}', using the generic instruction",
                style("!").yellow(),
                key
            );
        }
    }

    let bytes = tokio::fs::read(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let name = filename.clone();
    let text = tokio::task::spawn_blocking(move || extract::extract_text(&bytes, &name)).await?;

    println!(
        "{} Analyzing {} ({} chars) with {}",
        style("→").cyan(),
        filename,
        text.len(),
        settings.analysis.model
    );

    let client = AnalysisClient::new(settings.analysis.clone())?;
    let result = client.analyze(prompt, &text, analysis_type).await?;

    println!("{}", result);
    Ok(())
}

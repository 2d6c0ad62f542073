//! Analyze command implementation.

use crate::cli::output::SpinnerProgress;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::style::StyleStore;
use crate::surface::ToolSurface;
use anyhow::Result;
use std::sync::Arc;

/// Run the analyze command.
pub async fn run_analyze(url: &str, lang: Option<String>, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Analyze, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'speil doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let surface = ToolSurface::from_settings(&settings, Arc::new(StyleStore::new()))?;

    let progress = SpinnerProgress(Output::spinner("Starting analysis..."));
    let result = surface.analyze_style(url, lang.as_deref(), &progress).await;
    progress.0.finish_and_clear();

    if let Some(message) = result.strip_prefix("Error: ") {
        Output::error(message);
        anyhow::bail!("Style analysis failed");
    }

    println!("{}", result);
    Output::success("Save this output to a file and pass it to 'speil mirror --style-file'.");

    Ok(())
}

//! Mirror command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::{Prompts, Settings};
use crate::llm::OpenAIChat;
use crate::style::StyleTransformer;
use anyhow::{Context, Result};
use std::sync::Arc;

/// Run the mirror command.
pub async fn run_mirror(
    text: &str,
    style: Option<String>,
    style_file: Option<String>,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Mirror, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'speil doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let profile = match (style, style_file) {
        (Some(style), _) => style,
        (None, Some(path)) => {
            let path = Settings::expand_path(&path);
            std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read style file {}", path.display()))?
        }
        (None, None) => anyhow::bail!("Either --style or --style-file is required"),
    };

    let prompts = Prompts::load(
        settings.prompts.custom_dir.as_deref(),
        Some(&settings.prompts.variables),
    )?;
    let model = Arc::new(OpenAIChat::from_settings(&settings.llm)?);
    let transformer = StyleTransformer::new(model)
        .with_prompts(prompts)
        .with_settings(settings.transform.clone());

    let spinner = Output::spinner("Rewriting...");

    match transformer.transform(text, profile.trim()).await {
        Ok(rewritten) => {
            spinner.finish_and_clear();
            println!("{}", rewritten);
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("{}", e));
            return Err(e.into());
        }
    }

    Ok(())
}

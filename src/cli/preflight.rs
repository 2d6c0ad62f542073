//! Pre-flight checks before expensive operations.
//!
//! Validates that required tools and configuration are available
//! before starting operations that would otherwise fail midway.

use crate::config::Settings;
use crate::error::{Result, SpeilError};
use std::process::Command;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Analysis needs the transcript command and an API key.
    Analyze,
    /// Mirroring only needs an API key.
    Mirror,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Analyze => {
            check_api_key(settings)?;
            check_tool(&settings.transcript.command)?;
        }
        Operation::Mirror => {
            check_api_key(settings)?;
        }
    }
    Ok(())
}

/// Check if an OpenAI API key is configured, in the config file or environment.
fn check_api_key(settings: &Settings) -> Result<()> {
    if settings.llm.api_key.as_deref().is_some_and(|k| !k.is_empty()) {
        return Ok(());
    }

    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(SpeilError::Config(
            "OPENAI_API_KEY is empty. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
        Err(_) => Err(SpeilError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
    }
}

/// Check if an external tool is available.
pub(crate) fn check_tool(name: &str) -> Result<()> {
    match Command::new(name).arg("--version").output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(_) => Err(SpeilError::ToolNotFound(format!(
            "{} is installed but not working correctly",
            name
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(SpeilError::ToolNotFound(name.to_string()))
        }
        Err(e) => Err(SpeilError::ToolNotFound(format!("{}: {}", name, e))),
    }
}

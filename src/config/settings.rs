//! Configuration settings for Speil.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable that overrides the default transcript language.
pub const DEFAULT_LANGUAGE_ENV: &str = "DEFAULT_LANGUAGE";

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub llm: LlmSettings,
    pub analysis: AnalysisSettings,
    pub transform: TransformSettings,
    pub transcript: TranscriptSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Transcript language used when a caller does not pass one.
    pub default_language: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            default_language: "en".to_string(),
        }
    }
}

/// LLM backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Chat completion model used for both analysis and rewriting.
    pub model: String,
    /// API key. Falls back to OPENAI_API_KEY when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// HTTP timeout for a single completion call.
    pub timeout_seconds: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            api_key: None,
            timeout_seconds: crate::openai::DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Sampling parameters for style analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    pub temperature: f32,
    pub max_tokens: u32,
    /// Transcripts longer than this (in characters) are sampled head/middle/tail.
    pub max_sample_chars: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            max_tokens: 1500,
            max_sample_chars: 8000,
        }
    }
}

/// Sampling parameters for style transfer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformSettings {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for TransformSettings {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 2000,
        }
    }
}

/// Transcript provider settings.
///
/// The provider is an MCP server launched as a subprocess for every fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptSettings {
    /// Executable that starts the transcript MCP server.
    pub command: String,
    /// Arguments passed to the executable.
    pub args: Vec<String>,
    /// Name of the tool that returns a transcript.
    pub tool_name: String,
}

impl Default for TranscriptSettings {
    fn default() -> Self {
        Self {
            command: "npx".to_string(),
            args: vec![
                "-y".to_string(),
                "@kimtaeyoon83/mcp-server-youtube-transcript".to_string(),
            ],
            tool_name: "get_transcript".to_string(),
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    ///
    /// Environment overrides are applied after the file is read.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        let mut settings = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Settings::default()
        };

        settings.apply_env(std::env::var(DEFAULT_LANGUAGE_ENV).ok());
        Ok(settings)
    }

    /// Apply environment overrides.
    fn apply_env(&mut self, default_language: Option<String>) {
        if let Some(lang) = default_language.filter(|l| !l.trim().is_empty()) {
            self.general.default_language = lang.trim().to_string();
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::SpeilError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("speil")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.llm.model, "gpt-4o");
        assert_eq!(settings.general.default_language, "en");
        assert_eq!(settings.analysis.max_sample_chars, 8000);
        assert!(settings.analysis.temperature < settings.transform.temperature);
        assert!(settings.analysis.max_tokens < settings.transform.max_tokens);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[llm]\nmodel = \"gpt-4o-mini\"\n").unwrap();

        let settings = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(settings.llm.model, "gpt-4o-mini");
        assert_eq!(settings.transform.max_tokens, 2000);
        assert_eq!(settings.transcript.command, "npx");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut settings = Settings::default();
        settings.transcript.tool_name = "fetch_transcript".to_string();
        settings.save_to(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let reloaded: Settings = toml::from_str(&content).unwrap();
        assert_eq!(reloaded.transcript.tool_name, "fetch_transcript");
    }

    #[test]
    fn test_env_language_override() {
        let mut settings = Settings::default();
        settings.apply_env(Some("de".to_string()));
        assert_eq!(settings.general.default_language, "de");

        settings.apply_env(Some("  ".to_string()));
        assert_eq!(settings.general.default_language, "de");

        settings.apply_env(None);
        assert_eq!(settings.general.default_language, "de");
    }
}

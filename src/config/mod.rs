//! Configuration module for Speil.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{AnalysisPrompts, Prompts, TransformPrompts};
pub use settings::{
    AnalysisSettings, GeneralSettings, LlmSettings, PromptSettings, Settings,
    TranscriptSettings, TransformSettings, DEFAULT_LANGUAGE_ENV,
};

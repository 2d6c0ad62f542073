//! Style transfer: rewrite text following a stored style profile.

use crate::config::{Prompts, TransformSettings};
use crate::error::{Result, SpeilError};
use crate::llm::{CompletionModel, CompletionRequest};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};

/// Rewrites text in a given style with one LLM call.
pub struct StyleTransformer {
    model: Arc<dyn CompletionModel>,
    prompts: Prompts,
    settings: TransformSettings,
}

impl StyleTransformer {
    pub fn new(model: Arc<dyn CompletionModel>) -> Self {
        Self {
            model,
            prompts: Prompts::default(),
            settings: TransformSettings::default(),
        }
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn with_settings(mut self, settings: TransformSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Rewrite `text` following `profile`. The model's answer is returned verbatim.
    #[instrument(skip_all, fields(chars = text.chars().count()))]
    pub async fn transform(&self, text: &str, profile: &str) -> Result<String> {
        let mut vars = HashMap::new();
        vars.insert("style_guide".to_string(), profile.to_string());
        vars.insert("text".to_string(), text.to_string());

        let request = CompletionRequest {
            system: self.prompts.render_with_custom(&self.prompts.transform.system, &vars),
            user: self.prompts.render_with_custom(&self.prompts.transform.user, &vars),
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        };

        info!("Rewriting text with {}", self.model.model());

        self.model
            .complete(&request)
            .await
            .map_err(|e| SpeilError::StyleTransformFailed(e.to_string()))
    }
}

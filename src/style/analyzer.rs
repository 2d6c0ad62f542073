//! Style analysis: transcript text in, style profile out.

use crate::config::{AnalysisSettings, Prompts};
use crate::error::{Result, SpeilError};
use crate::llm::{CompletionModel, CompletionRequest};
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Marker placed between the sampled sections of a long transcript.
pub const SECTION_SEPARATOR: &str = "\n...\n";

/// Derives a style profile from transcript text with one LLM call.
pub struct StyleAnalyzer {
    model: Arc<dyn CompletionModel>,
    prompts: Prompts,
    settings: AnalysisSettings,
}

impl StyleAnalyzer {
    pub fn new(model: Arc<dyn CompletionModel>) -> Self {
        Self {
            model,
            prompts: Prompts::default(),
            settings: AnalysisSettings::default(),
        }
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn with_settings(mut self, settings: AnalysisSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Produce a style profile for the given transcript.
    ///
    /// The model's answer is returned verbatim.
    #[instrument(skip_all, fields(chars = transcript.chars().count()))]
    pub async fn analyze(&self, transcript: &str) -> Result<String> {
        if transcript.is_empty() {
            return Err(SpeilError::EmptyTranscript);
        }

        let sample = sample_transcript(transcript, self.settings.max_sample_chars);
        if let Cow::Owned(_) = sample {
            debug!(
                "Transcript sampled down to {} characters",
                sample.chars().count()
            );
        }

        let mut vars = HashMap::new();
        vars.insert("sample".to_string(), sample.into_owned());

        let request = CompletionRequest {
            system: self.prompts.analysis.system.clone(),
            user: self.prompts.render_with_custom(&self.prompts.analysis.user, &vars),
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        };

        info!("Analyzing language style with {}", self.model.model());

        self.model
            .complete(&request)
            .await
            .map_err(|e| SpeilError::StyleAnalysisFailed(e.to_string()))
    }
}

/// Reduce an overlong transcript to its opening, middle and closing sections.
///
/// Text of at most `max_chars` characters is returned untouched. Longer text
/// becomes three sections of `max_chars / 3` characters each (the middle one
/// centered on the midpoint) joined by [`SECTION_SEPARATOR`].
pub fn sample_transcript(text: &str, max_chars: usize) -> Cow<'_, str> {
    let len = text.chars().count();
    if len <= max_chars {
        return Cow::Borrowed(text);
    }

    let section = max_chars / 3;
    let mid = len / 2;

    let head = char_slice(text, 0, section);
    let middle = char_slice(text, mid - section / 2, mid + section / 2);
    let tail = char_slice(text, len - section, len);

    Cow::Owned([head, middle, tail].join(SECTION_SEPARATOR))
}

/// Slice by character positions rather than bytes.
fn char_slice(text: &str, start: usize, end: usize) -> &str {
    let byte_at = |pos: usize| {
        text.char_indices()
            .nth(pos)
            .map(|(i, _)| i)
            .unwrap_or(text.len())
    };
    &text[byte_at(start)..byte_at(end)]
}

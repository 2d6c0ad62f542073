//! The operation set exposed to callers.
//!
//! Every operation returns a `String`. Failures are reported in-band as text
//! starting with `Error:`; typed errors stop here.

use crate::config::{Prompts, Settings};
use crate::error::{Result, SpeilError};
use crate::llm::{CompletionModel, OpenAIChat};
use crate::style::{StyleAnalyzer, StyleStore, StyleTransformer};
use crate::transcript::{McpTranscriptClient, TranscriptFetcher};
use crate::video_id::VideoIdResolver;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Steps reported while analyzing a style.
pub const ANALYSIS_STEPS: u32 = 3;

/// Receives progress updates from long-running operations.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, progress: u32, total: u32, message: &str);
}

/// Progress reporter that only logs.
pub struct LogProgress;

impl ProgressReporter for LogProgress {
    fn report(&self, progress: u32, total: u32, message: &str) {
        info!("[{}/{}] {}", progress, total, message);
    }
}

/// Style analysis and mirroring operations over a shared style store.
pub struct ToolSurface {
    resolver: VideoIdResolver,
    fetcher: Arc<dyn TranscriptFetcher>,
    analyzer: StyleAnalyzer,
    transformer: StyleTransformer,
    store: Arc<StyleStore>,
    default_language: String,
}

impl ToolSurface {
    /// Assemble a surface from its collaborators, with default prompts and sampling.
    pub fn new(
        store: Arc<StyleStore>,
        fetcher: Arc<dyn TranscriptFetcher>,
        model: Arc<dyn CompletionModel>,
        default_language: &str,
    ) -> Self {
        Self {
            resolver: VideoIdResolver::new(),
            fetcher,
            analyzer: StyleAnalyzer::new(model.clone()),
            transformer: StyleTransformer::new(model),
            store,
            default_language: default_language.to_string(),
        }
    }

    /// Build the production surface: OpenAI backend and MCP transcript client.
    pub fn from_settings(settings: &Settings, store: Arc<StyleStore>) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;
        let model: Arc<dyn CompletionModel> = Arc::new(OpenAIChat::from_settings(&settings.llm)?);
        let fetcher = Arc::new(McpTranscriptClient::from_settings(&settings.transcript));

        info!(
            "Using {} for analysis, transcripts via {}",
            settings.llm.model, settings.transcript.command
        );

        Ok(Self {
            resolver: VideoIdResolver::new(),
            fetcher,
            analyzer: StyleAnalyzer::new(model.clone())
                .with_prompts(prompts.clone())
                .with_settings(settings.analysis.clone()),
            transformer: StyleTransformer::new(model)
                .with_prompts(prompts)
                .with_settings(settings.transform.clone()),
            store,
            default_language: settings.general.default_language.clone(),
        })
    }

    pub fn store(&self) -> &Arc<StyleStore> {
        &self.store
    }

    /// Analyze the language style of the speaker in a video and remember it
    /// under the video's ID.
    pub async fn analyze_style(
        &self,
        url: &str,
        lang: Option<&str>,
        progress: &dyn ProgressReporter,
    ) -> String {
        match self.try_analyze(url, lang, progress).await {
            Ok(profile) => profile,
            Err(SpeilError::EmptyTranscript) => {
                "Error: Could not extract transcript text from the video.".to_string()
            }
            Err(e) => {
                warn!("Style analysis for {} failed: {}", url, e);
                format!("Error: Failed to analyze YouTube style: {}", e)
            }
        }
    }

    #[instrument(skip(self, progress))]
    async fn try_analyze(
        &self,
        url: &str,
        lang: Option<&str>,
        progress: &dyn ProgressReporter,
    ) -> Result<String> {
        let lang = lang
            .filter(|l| !l.trim().is_empty())
            .unwrap_or(&self.default_language);

        progress.report(0, ANALYSIS_STEPS, &format!("Fetching transcript for {}", url));
        let transcript = self.fetcher.fetch_transcript(url, lang, true).await?;

        progress.report(1, ANALYSIS_STEPS, "Analyzing language style");
        let profile = self.analyzer.analyze(&transcript.text).await?;

        let style_id = self.resolver.resolve(url);
        self.store.put(&style_id, &profile);
        info!("Stored style {}", style_id);

        progress.report(ANALYSIS_STEPS, ANALYSIS_STEPS, "Analysis complete");
        Ok(profile)
    }

    /// Rewrite `text` in a stored style.
    pub async fn mirror_style(&self, text: &str, style_id: &str) -> String {
        let profile = match self.store.get(style_id) {
            Ok(profile) => profile,
            Err(_) => {
                return format!(
                    "Error: Style with ID '{}' not found. Please analyze a style first.",
                    style_id
                )
            }
        };

        match self.transformer.transform(text, &profile).await {
            Ok(rewritten) => rewritten,
            Err(e) => {
                warn!("Mirroring with style {} failed: {}", style_id, e);
                format!("Error: Failed to mirror style: {}", e)
            }
        }
    }

    /// Save a caller-written style description.
    pub fn save_style(&self, style_id: &str, description: &str) -> String {
        self.store.put(style_id, description);
        info!("Saved style {}", style_id);
        format!("Successfully saved style with ID: {}", style_id)
    }

    /// List the identifiers of all stored styles.
    pub fn list_styles(&self) -> String {
        let ids = self.store.list();
        if ids.is_empty() {
            return "No styles have been saved yet.".to_string();
        }

        let mut output = "Saved styles:\n\n".to_string();
        for id in &ids {
            output.push_str(&format!("- {}\n", id));
        }
        output
    }

    /// Read a stored style profile.
    pub fn get_style(&self, style_id: &str) -> String {
        self.store
            .get(style_id)
            .unwrap_or_else(|_| format!("Style with ID '{}' not found.", style_id))
    }
}

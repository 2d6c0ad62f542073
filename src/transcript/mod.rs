//! Transcript fetching.
//!
//! Transcripts come from an external provider. The production client talks
//! to a YouTube transcript MCP server launched as a subprocess.

mod client;
mod payload;

pub use client::McpTranscriptClient;
pub use payload::TranscriptPayload;

use crate::error::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Transcript text plus whatever metadata the provider returned with it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    pub text: String,
    pub metadata: Map<String, Value>,
}

/// Trait for transcript providers.
#[async_trait]
pub trait TranscriptFetcher: Send + Sync {
    /// Fetch the transcript of a video.
    ///
    /// `reference` is passed through as given (URL or ID).
    async fn fetch_transcript(
        &self,
        reference: &str,
        language: &str,
        paragraphs: bool,
    ) -> Result<Transcript>;
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use crate::error::SpeilError;
    use std::sync::Mutex;

    /// Returns a fixed transcript and records the calls it receives.
    pub struct StubFetcher {
        text: std::result::Result<String, String>,
        pub calls: Mutex<Vec<(String, String, bool)>>,
    }

    impl StubFetcher {
        pub fn returning(text: &str) -> Self {
            Self {
                text: Ok(text.to_string()),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(message: &str) -> Self {
            Self {
                text: Err(message.to_string()),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TranscriptFetcher for StubFetcher {
        async fn fetch_transcript(
            &self,
            reference: &str,
            language: &str,
            paragraphs: bool,
        ) -> Result<Transcript> {
            self.calls
                .lock()
                .unwrap()
                .push((reference.to_string(), language.to_string(), paragraphs));
            let text = self.text.clone().map_err(SpeilError::TranscriptUnavailable)?;
            Ok(Transcript {
                text,
                metadata: Map::new(),
            })
        }
    }
}

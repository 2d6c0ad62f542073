//! Transcript client for a YouTube transcript MCP server.
//!
//! Every fetch launches the server, performs the MCP handshake, calls the
//! transcript tool once and shuts the process down again.

use super::{Transcript, TranscriptFetcher};
use crate::config::TranscriptSettings;
use crate::error::{Result, SpeilError};
use async_trait::async_trait;
use rmcp::{
    model::CallToolRequestParam,
    service::{RunningService, ServiceExt},
    transport::{ConfigureCommandExt, TokioChildProcess},
    ClientHandler, RoleClient,
};
use serde_json::{json, Value};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

fn unavailable(context: &str, cause: impl std::fmt::Display) -> SpeilError {
    SpeilError::TranscriptUnavailable(format!("{}: {}", context, cause))
}

/// Answers server-initiated requests such as `ping` with the default replies.
#[derive(Clone, Debug, Default)]
struct TranscriptClientHandler;

impl ClientHandler for TranscriptClientHandler {}

type Session = RunningService<RoleClient, TranscriptClientHandler>;

/// Fetches transcripts through an MCP server subprocess.
pub struct McpTranscriptClient {
    command: String,
    args: Vec<String>,
    tool_name: String,
}

impl McpTranscriptClient {
    pub fn new(command: &str, args: Vec<String>, tool_name: &str) -> Self {
        Self {
            command: command.to_string(),
            args,
            tool_name: tool_name.to_string(),
        }
    }

    pub fn from_settings(settings: &TranscriptSettings) -> Self {
        Self::new(&settings.command, settings.args.clone(), &settings.tool_name)
    }

    /// Spawn the server and complete the `initialize` handshake.
    async fn connect(&self) -> Result<Session> {
        let command = Command::new(&self.command).configure(|c| {
            c.args(&self.args);
            c.stderr(Stdio::null());
            c.kill_on_drop(true);
        });

        let transport = TokioChildProcess::new(command).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SpeilError::TranscriptUnavailable(
                    SpeilError::ToolNotFound(self.command.clone()).to_string(),
                )
            } else {
                unavailable(&format!("Failed to start {}", self.command), e)
            }
        })?;

        let session = TranscriptClientHandler
            .serve(transport)
            .await
            .map_err(|e| unavailable("Transcript server handshake failed", format!("{e:?}")))?;

        debug!("Connected to transcript server {}", self.command);
        Ok(session)
    }

    async fn call_tool(&self, session: &Session, arguments: Value) -> Result<Value> {
        let request = CallToolRequestParam {
            name: self.tool_name.clone().into(),
            arguments: arguments.as_object().cloned(),
        };

        let result = session
            .call_tool(request)
            .await
            .map_err(|e| unavailable(&format!("{} failed", self.tool_name), format!("{e:?}")))?;

        let result = serde_json::to_value(&result)
            .map_err(|e| unavailable("Malformed result from transcript server", e))?;

        if result.get("isError").and_then(Value::as_bool) == Some(true) {
            let transcript = Transcript::from(result);
            return Err(unavailable("Transcript tool reported an error", transcript.text));
        }

        Ok(result)
    }
}

#[async_trait]
impl TranscriptFetcher for McpTranscriptClient {
    #[instrument(skip(self))]
    async fn fetch_transcript(
        &self,
        reference: &str,
        language: &str,
        paragraphs: bool,
    ) -> Result<Transcript> {
        info!("Fetching transcript via {}", self.command);

        let session = self.connect().await?;
        let result = self
            .call_tool(
                &session,
                json!({
                    "url": reference,
                    "lang": language,
                    "enableParagraphs": paragraphs,
                }),
            )
            .await;

        if let Err(e) = session.cancel().await {
            warn!("Failed to shut down transcript server: {}", e);
        }

        let transcript = Transcript::from(result?);
        if transcript.text.trim().is_empty() {
            return Err(SpeilError::TranscriptUnavailable(
                "Provider returned no transcript text".to_string(),
            ));
        }

        debug!("Transcript has {} characters", transcript.text.chars().count());
        Ok(transcript)
    }
}

//! Error types for Speil.

use thiserror::Error;

/// Library-level error type for Speil operations.
#[derive(Error, Debug)]
pub enum SpeilError {
    #[error("Transcript unavailable: {0}")]
    TranscriptUnavailable(String),

    #[error("Transcript is empty")]
    EmptyTranscript,

    #[error("Style analysis failed: {0}")]
    StyleAnalysisFailed(String),

    #[error("Style transform failed: {0}")]
    StyleTransformFailed(String),

    #[error("Style not found: {0}")]
    StyleNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),
}

/// Result type alias for Speil operations.
pub type Result<T> = std::result::Result<T, SpeilError>;

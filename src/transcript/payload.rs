//! Normalization of transcript provider payloads.

use super::Transcript;
use serde_json::{Map, Value};

/// The shapes a provider answer can take.
#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptPayload {
    /// An object with a string `text` field; other fields are metadata.
    Structured {
        text: String,
        metadata: Map<String, Value>,
    },
    /// An MCP tool result: text items of its `content` array.
    Content(Vec<String>),
    /// A bare string.
    Plain(String),
    /// Anything else; kept whole and stringified.
    Opaque(Value),
}

impl TranscriptPayload {
    /// Classify a raw provider value.
    pub fn decode(value: Value) -> Self {
        match value {
            Value::String(text) => Self::Plain(text),
            Value::Object(mut map) => {
                if matches!(map.get("text"), Some(Value::String(_))) {
                    if let Some(Value::String(text)) = map.remove("text") {
                        return Self::Structured { text, metadata: map };
                    }
                }

                if let Some(Value::Array(items)) = map.get("content") {
                    let texts: Vec<String> = items
                        .iter()
                        .filter(|item| item.get("type").and_then(Value::as_str) == Some("text"))
                        .filter_map(|item| item.get("text").and_then(Value::as_str))
                        .map(str::to_string)
                        .collect();
                    if !texts.is_empty() {
                        return Self::Content(texts);
                    }
                }

                Self::Opaque(Value::Object(map))
            }
            other => Self::Opaque(other),
        }
    }

    /// Flatten into a transcript.
    pub fn into_transcript(self) -> Transcript {
        match self {
            Self::Structured { text, metadata } => Transcript { text, metadata },
            Self::Content(texts) => Transcript {
                text: texts.join("\n"),
                metadata: Map::new(),
            },
            Self::Plain(text) => Transcript {
                text,
                metadata: Map::new(),
            },
            Self::Opaque(Value::Null) => Transcript::default(),
            Self::Opaque(value) => Transcript {
                text: value.to_string(),
                metadata: Map::new(),
            },
        }
    }
}

impl From<Value> for Transcript {
    fn from(value: Value) -> Self {
        TranscriptPayload::decode(value).into_transcript()
    }
}

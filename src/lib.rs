//! Speil - Language Style Mirroring
//!
//! An MCP server that learns how a person speaks from a YouTube transcript
//! and rewrites text in that style.
//!
//! The name "Speil" is the Norwegian word for "mirror."
//!
//! # Overview
//!
//! Speil allows you to:
//! - Derive a style guide from the transcript of a YouTube video
//! - Save hand-written style descriptions under your own names
//! - Rewrite any text in a saved style
//! - Expose all of this as MCP tools to an AI assistant
//!
//! # Architecture
//!
//! - `config` - Settings and prompt templates
//! - `video_id` - YouTube URL to video ID resolution
//! - `transcript` - Transcript fetching through an MCP transcript server
//! - `llm` - Chat completion backends
//! - `style` - Style analysis, transfer and the in-memory style store
//! - `surface` - The string-in, string-out operation set
//! - `mcp` - MCP server over stdio
//!
//! # Example
//!
//! ```rust,no_run
//! use speil::config::Settings;
//! use speil::style::StyleStore;
//! use speil::surface::{LogProgress, ToolSurface};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let surface = ToolSurface::from_settings(&settings, Arc::new(StyleStore::new()))?;
//!
//!     let profile = surface.analyze_style("dQw4w9WgXcQ", None, &LogProgress).await;
//!     println!("{}", profile);
//!
//!     let rewritten = surface.mirror_style("See you tomorrow.", "dQw4w9WgXcQ").await;
//!     println!("{}", rewritten);
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod mcp;
pub mod openai;
pub mod style;
pub mod surface;
pub mod transcript;
pub mod video_id;

pub use error::{Result, SpeilError};

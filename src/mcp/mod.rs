//! MCP (Model Context Protocol) server for Speil.
//!
//! Allows AI assistants like Claude to analyze and mirror language styles.
//! Implements JSON-RPC 2.0 over stdio.

mod protocol;
mod server;
mod tools;

pub use server::McpServer;

//! CLI module for Speil.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Speil - Language Style Mirroring
///
/// Learns how a person talks from a YouTube transcript and rewrites text in that style.
/// The name "Speil" is the Norwegian word for "mirror."
#[derive(Parser, Debug)]
#[command(name = "speil")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the MCP server on stdio for AI assistant integration (Claude, etc.)
    Serve,

    /// Analyze the language style of the speaker in a YouTube video
    Analyze {
        /// YouTube URL or video ID
        url: String,

        /// Transcript language code (defaults to general.default_language)
        #[arg(short, long)]
        lang: Option<String>,
    },

    /// Rewrite text in a given style
    Mirror {
        /// The text to rewrite
        text: String,

        /// Style description to follow
        #[arg(short, long, conflicts_with = "style_file", required_unless_present = "style_file")]
        style: Option<String>,

        /// File containing the style description (e.g. saved output of `speil analyze`)
        #[arg(long)]
        style_file: Option<String>,
    },

    /// Check system requirements and configuration
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mirror_with_style() {
        let cli = Cli::try_parse_from(["speil", "mirror", "hello", "--style", "terse"]).unwrap();
        match cli.command {
            Commands::Mirror { text, style, style_file } => {
                assert_eq!(text, "hello");
                assert_eq!(style.as_deref(), Some("terse"));
                assert!(style_file.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_mirror_requires_a_style() {
        assert!(Cli::try_parse_from(["speil", "mirror", "hello"]).is_err());
        assert!(Cli::try_parse_from([
            "speil", "mirror", "hello", "--style", "a", "--style-file", "b"
        ])
        .is_err());
    }

    #[test]
    fn test_verbosity_is_global() {
        let cli = Cli::try_parse_from(["speil", "analyze", "dQw4w9WgXcQ", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}

//! Speil CLI entry point.

use anyhow::Result;
use clap::Parser;
use speil::cli::{commands, Cli, Commands};
use speil::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    // Load configuration
    let config_path = cli.config.as_deref().map(Settings::expand_path);
    let settings = Settings::load_from(config_path.as_ref())?;

    // Initialize logging. stdout belongs to command output and JSON-RPC.
    let log_level = match cli.verbose {
        0 if matches!(cli.command, Commands::Serve) => settings.general.log_level.as_str(),
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("speil={}", log_level)),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match &cli.command {
        Commands::Serve => {
            commands::run_serve(settings).await?;
        }

        Commands::Analyze { url, lang } => {
            commands::run_analyze(url, lang.clone(), settings).await?;
        }

        Commands::Mirror {
            text,
            style,
            style_file,
        } => {
            commands::run_mirror(text, style.clone(), style_file.clone(), settings).await?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings)?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings, config_path)?;
        }
    }

    Ok(())
}

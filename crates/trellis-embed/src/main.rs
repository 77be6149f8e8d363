use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};
use trellis_core::WidgetIdentity;
use trellis_runtime::{LifecycleState, WidgetRuntime};

mod config;
mod hooks;

use config::EmbedConfig;
use hooks::ConsoleWidget;

#[derive(Parser)]
#[command(name = "trellis", about = "Trellis embedding harness — run a widget against a platform")]
struct Cli {
    /// Path to a TOML embed configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Website id (overrides the config file)
    #[arg(long)]
    website_id: Option<String>,

    /// App id (overrides the config file)
    #[arg(long)]
    app_id: Option<String>,

    /// Authorization service base URL (overrides the config file)
    #[arg(long)]
    base_url: Option<String>,

    /// Path to a JSON preview config; bypasses authorization entirely
    #[arg(long)]
    preview: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let embed = match &cli.config {
        Some(path) => EmbedConfig::from_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => EmbedConfig::default(),
    };

    let default_level = if embed.options.debug_enabled { "debug" } else { "info" };
    fmt()
        .with_env_filter(
            EnvFilter::try_from_env("TRELLIS_LOG")
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    // Flags win over the config file; a triple left blank by both is a hard
    // construction-time failure.
    let identity = WidgetIdentity::new(
        cli.website_id.unwrap_or(embed.widget.website_id),
        cli.app_id.unwrap_or(embed.widget.app_id),
        cli.base_url.unwrap_or(embed.widget.base_url),
        embed.widget.name,
        embed.widget.version,
    )?;

    let preview = match &cli.preview {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            Some(serde_json::from_str(&content).context("preview config is not valid JSON")?)
        }
        None => None,
    };

    tracing::info!(
        website_id = %identity.website_id,
        app_id = %identity.app_id,
        base_url = %identity.base_url,
        preview = preview.is_some(),
        "Embedding widget"
    );

    let mut runtime = WidgetRuntime::builder(identity, ConsoleWidget)
        .options(embed.options)
        .preview(preview)
        .build();

    runtime.start().await;

    match runtime.state() {
        LifecycleState::Running => {
            tracing::info!("Widget running; press Ctrl-C to stop");
            tokio::signal::ctrl_c().await?;
            runtime.stop().await;
        }
        state => {
            tracing::warn!(%state, "Widget did not reach running state");
        }
    }

    Ok(())
}

//! askrepo server binary

use anyhow::{Context, Result};
use askrepo::api::{self, AppState};
use askrepo::config;
use askrepo::provider::GeminiClient;
use askrepo::session::SessionStore;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "askrepo", version, about = "Ask questions about a GitHub repository")]
struct Cli {
    /// Config file (default: askrepo.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Listening port (overrides config file and PORT)
    #[arg(long, env = "ASKREPO_PORT")]
    port: Option<u16>,

    /// Root directory for cloned trees and session records
    #[arg(long, env = "ASKREPO_DATA_DIR")]
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("askrepo=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = config::load_config(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    if config.gemini.api_key.is_none() {
        tracing::warn!("no Gemini API key configured; /api/ask will fail until GEMINI_API_KEY is set");
    }

    let store = SessionStore::open(config.repos_dir(), config.sessions_dir())?;
    let state = AppState {
        store: Arc::new(store),
        provider: Arc::new(GeminiClient::new(&config.gemini)),
        include_extensions: config.include_extensions.clone(),
    };

    let app = api::router(state);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("Failed binding port {}", config.port))?;
    tracing::info!("server running on port {}", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed installing ctrl-c handler: {e}");
    }
}

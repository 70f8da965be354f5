mod config;
mod routes;

use clap::Parser;
use riwaya_lib::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "riwaya-api", version, about = "Serve hadith collections over HTTP")]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Listen address, overrides `server.bind`
    #[arg(long)]
    bind: Option<String>,

    /// Corpus directory probed before the configured search paths (repeatable)
    #[arg(long = "data-dir")]
    data_dirs: Vec<PathBuf>,

    /// Grade recorded for hadiths without one, overrides `corpus.default_grade`
    #[arg(long)]
    default_grade: Option<String>,
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let mut config = config::load_config(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }
    if !cli.data_dirs.is_empty() {
        let mut paths = cli.data_dirs;
        paths.append(&mut config.corpus.search_paths);
        config.corpus.search_paths = paths;
    }
    if let Some(grade) = cli.default_grade {
        config.corpus.default_grade = grade;
    }

    // Corpus is loaded completely before the listener binds
    let state = Arc::new(AppState::new(config.state_options())?);
    let app = routes::router(state, &config.server)?;

    let listener = tokio::net::TcpListener::bind(config.server.bind.as_str()).await?;
    tracing::info!("Listening on http://{}", config.server.bind);
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

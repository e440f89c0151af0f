use std::sync::Arc;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use article_shelf::config::Config;
use article_shelf::publish::{ContentStore, GitHubContents};
use article_shelf::web::{self, AppState};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    init_tracing()?;

    info!("Starting article-shelf");

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    info!(
        articles_url = %config.articles_url,
        repo_file = %config.repo_file,
        "Configuration loaded"
    );

    let source: Arc<dyn ContentStore> =
        Arc::new(GitHubContents::new(&config).context("Failed to build HTTP client")?);

    let refresh_interval = config.refresh_interval;
    let state = AppState::new(config, source)
        .await
        .context("Failed to initialize application state")?;

    let shutdown = CancellationToken::new();

    let refresh_handle = tokio::spawn(web::refresh_loop(
        Arc::clone(&state.source),
        Arc::clone(&state.public),
        Arc::clone(&state.refresh),
        refresh_interval,
        shutdown.clone(),
    ));

    let web_shutdown = shutdown.clone();
    let web_handle = tokio::spawn(async move {
        if let Err(e) = web::serve(state, web_shutdown).await {
            error!("Web server error: {e:#}");
        }
    });

    shutdown_signal().await;

    info!("Shutting down...");
    shutdown.cancel();

    // Cancellation already fired, so these only wait for in-flight work.
    let _ = refresh_handle.await;
    let _ = web_handle.await;

    info!("Shutdown complete");

    Ok(())
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,article_shelf=debug"));

    // Check if JSON logging is requested
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| matches!(v.to_lowercase().as_str(), "json" | "structured"))
        .unwrap_or(false);

    if use_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}

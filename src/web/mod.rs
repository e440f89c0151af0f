mod admin;
pub mod pages;
mod refresh;
mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::FromRef;
use axum::Router;
use tokio::sync::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::articles::ArticleStore;
use crate::auth::AdminGate;
use crate::config::Config;
use crate::publish::{ContentStore, CredentialStore, Credentials, Publisher};
use crate::session::AdminSession;

pub use refresh::{
    fetch_editor_collection, refresh_loop, refresh_once, refresh_tick, RefreshControl,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub source: Arc<dyn ContentStore>,
    pub publisher: Arc<Publisher>,
    /// Snapshot served by the public listing.
    pub public: Arc<RwLock<ArticleStore>>,
    /// The admin editor. There is a single admin session per process.
    pub admin: Arc<Mutex<AdminSession>>,
    pub credentials: CredentialStore,
    pub gate: AdminGate,
    pub refresh: Arc<RefreshControl>,
}

impl FromRef<AppState> for AdminGate {
    fn from_ref(state: &AppState) -> Self {
        state.gate.clone()
    }
}

impl AppState {
    /// Build the state and load the published collection.
    ///
    /// When saved credentials are complete the editor is seeded through the
    /// authenticated API, so its first publish is checked against the loaded
    /// revision. A failed initial load is not fatal: the views start empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the admin password cannot be hashed.
    pub async fn new(config: Config, source: Arc<dyn ContentStore>) -> Result<Self> {
        let gate = AdminGate::new(&config.admin_password).context("Failed to set up admin gate")?;
        let publisher = Publisher::new(
            Arc::clone(&source),
            config.request_timeout,
            config.commit_message.clone(),
        );

        let credentials = CredentialStore::new(config.credentials_path.clone());
        let saved = credentials.load().await.unwrap_or_else(|e| {
            warn!("Failed to load saved credentials: {e:#}");
            Credentials::default()
        });

        let mut store = ArticleStore::default();
        store.load(source.as_ref()).await;

        let admin = if saved.is_complete() {
            let (articles, revision) = fetch_editor_collection(source.as_ref(), &saved).await;
            let mut session = AdminSession::default();
            session.replace_articles(articles, revision);
            session
        } else {
            AdminSession::new(store.clone())
        };

        Ok(Self {
            credentials,
            config: Arc::new(config),
            source,
            publisher: Arc::new(publisher),
            public: Arc::new(RwLock::new(store)),
            admin: Arc::new(Mutex::new(admin)),
            gate,
            refresh: Arc::new(RefreshControl::default()),
        })
    }
}

/// Start the web server and run until `shutdown` is cancelled.
///
/// # Errors
///
/// Returns an error if the server fails to start.
pub async fn serve(state: AppState, shutdown: CancellationToken) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", state.config.web_host, state.config.web_port)
        .parse()
        .context("Invalid web server address")?;

    let app = create_app(state);

    info!(addr = %addr, "Starting HTTP web server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind web server")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .context("Web server error")?;

    Ok(())
}

/// Create the main application router.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(routes::router())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

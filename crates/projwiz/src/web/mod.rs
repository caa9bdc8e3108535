//! Local web form
//!
//! Serves a single-page form and a small JSON API over the same pipeline
//! the `new` command uses. Router state holds the config behind a lock so
//! `POST /api/save_config` is visible to the requests that follow it.

mod handlers;

use axum::routing::{get, post};
use axum::Router;
use projwiz_core::config::{ConfigStore, WizardConfig};
use projwiz_core::process::CommandRunner;
use std::io;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Port the form is served on unless told otherwise
pub const DEFAULT_PORT: u16 = 9000;

/// Consecutive ports tried before giving up
pub const PORT_ATTEMPTS: u16 = 10;

/// Shared state behind every handler
pub struct AppState {
    pub store: ConfigStore,
    pub config: RwLock<WizardConfig>,
    pub runner: Arc<dyn CommandRunner>,
}

impl AppState {
    pub fn new(store: ConfigStore, config: WizardConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            store,
            config: RwLock::new(config),
            runner,
        }
    }

    /// Copy of the current config, so no lock is held across network calls
    pub async fn snapshot(&self) -> WizardConfig {
        self.config.read().await.clone()
    }
}

pub type SharedState = Arc<AppState>;

/// Routes of the web form
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/templates", get(handlers::templates))
        .route("/api/repositories", get(handlers::repositories))
        .route("/api/branches/{owner}/{repo}", get(handlers::branches))
        .route("/api/config", get(handlers::config))
        .route("/api/create_project", post(handlers::create_project))
        .route("/api/save_config", post(handlers::save_config))
        .route("/api/test_token", post(handlers::test_token))
        .fallback(handlers::not_found)
        .with_state(state)
}

/// Bind `host:port`, moving forward one port at a time when it is taken
///
/// Returns the listener and the port actually bound. Port 0 asks the OS
/// for any free port.
///
/// # Errors
/// Returns the last bind error once [`PORT_ATTEMPTS`] ports have failed.
pub async fn bind_with_fallback(host: &str, port: u16) -> io::Result<(TcpListener, u16)> {
    let mut last_error = None;

    for offset in 0..PORT_ATTEMPTS {
        let Some(candidate) = port.checked_add(offset) else {
            break;
        };
        match TcpListener::bind((host, candidate)).await {
            Ok(listener) => {
                let bound = listener.local_addr()?.port();
                return Ok((listener, bound));
            }
            Err(e) => {
                debug!("Port {} unavailable: {}", candidate, e);
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| io::Error::new(io::ErrorKind::AddrInUse, "no free port")))
}

/// Serve the form on an already bound listener until the process exits
pub async fn serve(listener: TcpListener, state: SharedState) -> io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("Serving web form on http://{}", addr);
    }
    axum::serve(listener, router(state)).await
}

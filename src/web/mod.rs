//! HTTP surface
//!
//! Server-rendered pages over axum. Handlers stay thin: they read the
//! session, call into [`crate::core`], and render a tera template.
//!
//! # Modules
//!
//! - [`router`] - Route table and request tracing
//! - [`handlers`] - One module per area (auth, dashboards, profiles, admin)
//! - [`session`] - Session cookie and per-role identity lookup
//! - [`render`] - Compiled-in templates
//! - [`error`] - Error-to-response mapping
//! - [`state`] - Shared application state

pub mod error;
pub mod handlers;
pub mod render;
pub mod router;
pub mod session;
pub mod state;

pub use error::{WebError, WebResult};
pub use router::build_router;
pub use state::{AppState, SharedState};

use crate::domain::{PortalError, Result};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;

const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(300);

async fn wait_for_shutdown(mut shutdown: watch::Receiver<bool>) {
    while !*shutdown.borrow() {
        if shutdown.changed().await.is_err() {
            return;
        }
    }
}

/// Serves the portal on `listener` until `shutdown` flips to `true`
///
/// Expired sessions are purged in the background while the server runs.
///
/// # Errors
///
/// Returns `PortalError::Io` if the server loop fails.
pub async fn serve(
    listener: TcpListener,
    state: SharedState,
    shutdown: watch::Receiver<bool>,
) -> Result<()> {
    let sessions = state.sessions.clone();
    let purge_shutdown = shutdown.clone();
    let purge = tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_PURGE_INTERVAL);
        let stop = wait_for_shutdown(purge_shutdown);
        tokio::pin!(stop);
        loop {
            tokio::select! {
                _ = &mut stop => break,
                _ = interval.tick() => {
                    let purged = sessions.purge_expired().await;
                    if purged > 0 {
                        tracing::debug!(purged, "Purged expired sessions");
                    }
                }
            }
        }
    });

    if let Ok(addr) = listener.local_addr() {
        tracing::info!(address = %addr, "Portal listening");
    }
    let result = axum::serve(listener, build_router(state))
        .with_graceful_shutdown(wait_for_shutdown(shutdown))
        .await
        .map_err(|e| PortalError::Io(format!("server error: {e}")));

    purge.abort();
    tracing::info!("Portal stopped");
    result
}

mod errors;
mod handlers;
#[cfg(test)]
mod tests;

use std::sync::Arc;

use anyhow::Result;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

use crate::storage::{ClaimStore, MrfFileStorage};

pub use errors::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ClaimStore<MrfFileStorage>>
}

pub fn router(store: Arc<ClaimStore<MrfFileStorage>>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/upload", post(handlers::upload))
        .route("/upload/csv", post(handlers::upload_csv))
        .route("/claims", get(handlers::list_claims))
        .route("/claims/approved", get(handlers::list_approved_claims))
        .route("/claims/approve", post(handlers::approve_claims))
        .route("/claims/reject", post(handlers::reject_claims))
        .route("/mrf", get(handlers::list_mrf_files))
        .route("/mrf/generate", post(handlers::generate_mrf))
        .route("/mrf/{id}", get(handlers::get_mrf_file))
        .route("/mrf/{id}/download", get(handlers::download_mrf_file))
        .with_state(AppState { store })
}

/// Serves the API on `bind` until ctrl-c is received.
pub async fn serve(bind: &str, store: Arc<ClaimStore<MrfFileStorage>>) -> Result<()> {
    let listener = TcpListener::bind(bind).await?;

    info!("Server is running on http://{}", listener.local_addr()?);

    axum::serve(listener, router(store))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    //NOTE: If the signal handler cannot be installed we keep serving rather than exiting immediately
    if signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

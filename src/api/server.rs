use crate::api::types::AppState;
use crate::config::AuthConfig;
use crate::events::SessionEvents;
use anyhow::Result;
use manga_reader_storage::Storage;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

pub async fn serve(
    port: u16,
    storage: Storage,
    events: SessionEvents,
    auth: Arc<AuthConfig>,
) -> Result<()> {
    let state = AppState {
        storage,
        events,
        auth,
    };
    let app = super::routes::create_router(state);

    let address = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&address).await?;
    tracing::info!("API listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        tracing::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

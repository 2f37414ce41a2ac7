use crate::config::Args;
use crate::events::{self, SessionEvents};
use anyhow::Result;
use manga_reader_storage::Storage;
use std::sync::Arc;
use tokio::select;

pub async fn run(args: Args) -> Result<()> {
    // 1. Storage
    let storage = Storage::new(&args.data_dir).await?;
    tracing::info!("Opened storage at {}", args.data_dir);

    // 2. Administrators named in config
    let auth = args.auth_config();
    for email in auth.admin_emails() {
        match storage.promote_admin(email).await {
            Ok(true) => tracing::info!("Granted admin to {}", email),
            Ok(false) => tracing::debug!("No account yet for admin {}", email),
            Err(e) => tracing::error!("Failed to promote admin {}: {:?}", email, e),
        }
    }

    // 3. Session event channel
    let (session_events, mut event_rx) = SessionEvents::channel(32);

    // 4. Run Loop
    let api_server = crate::api::server::serve(args.port, storage, session_events, Arc::new(auth));

    select! {
        result = api_server => result?,
        _ = async {
            while let Some(event) = event_rx.recv().await {
                events::log_event(&event);
            }
        } => {},
    }

    tracing::info!("Server stopped");
    Ok(())
}

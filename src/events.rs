use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedUp { user_id: String, email: String },
    SignedIn { user_id: String, email: String },
    SignedOut { user_id: String },
}

/// Sending half handed to request handlers. Publishing never blocks a
/// request: a full or closed channel drops the event.
#[derive(Clone)]
pub struct SessionEvents {
    tx: mpsc::Sender<SessionEvent>,
}

impl SessionEvents {
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<SessionEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    pub fn publish(&self, event: SessionEvent) {
        if let Err(e) = self.tx.try_send(event) {
            tracing::debug!("Dropped session event: {}", e);
        }
    }
}

pub fn log_event(event: &SessionEvent) {
    match event {
        SessionEvent::SignedUp { user_id, email } => {
            tracing::info!("User {} signed up as {}", user_id, email)
        }
        SessionEvent::SignedIn { user_id, email } => {
            tracing::info!("User {} signed in as {}", user_id, email)
        }
        SessionEvent::SignedOut { user_id } => tracing::info!("User {} signed out", user_id),
    }
}

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use super::events::{ChatEvent, SessionId};

/// Maximum queued outbound events per session (prevents memory exhaustion from slow clients).
pub const MAX_OUTBOUND_QUEUE: usize = 1024;

/// A connected chat session. One per WebSocket connection — a user with two
/// open tabs holds two sessions.
#[derive(Debug)]
pub struct UserSession {
    pub id: SessionId,
    pub user_id: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    /// Send outbound events to this session's write loop (bounded to prevent memory exhaustion).
    pub outbound: mpsc::Sender<ChatEvent>,
    pub connected_at: DateTime<Utc>,
}

impl UserSession {
    pub fn new(
        id: SessionId,
        user_id: String,
        display_name: String,
        avatar_url: Option<String>,
        outbound: mpsc::Sender<ChatEvent>,
    ) -> Self {
        Self {
            id,
            user_id,
            display_name,
            avatar_url,
            outbound,
            connected_at: Utc::now(),
        }
    }

    /// Send an event to this session. Returns false if the channel is closed
    /// or the outbound queue is full (slow client protection — drops event rather than blocking).
    pub fn send(&self, event: ChatEvent) -> bool {
        self.outbound.try_send(event).is_ok()
    }
}

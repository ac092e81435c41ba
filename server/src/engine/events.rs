use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::models::MessageRow;

/// Unique identifier for a message.
pub type MessageId = Uuid;

/// Unique identifier for a connected session (one per connection, not per user).
pub type SessionId = Uuid;

/// Wire shape of a chat message, shared by the REST and WebSocket surfaces.
/// Author name/avatar are snapshots taken at send time; they do not track
/// later profile changes. A deleted message is a tombstone: `deleted` set,
/// text blank, `deleted_by` naming the role that removed it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: MessageId,
    pub club_id: String,
    pub author_id: String,
    pub author_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_avatar: Option<String>,
    pub text: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edited_at: Option<DateTime<Utc>>,
    pub deleted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_by: Option<String>,
}

impl From<MessageRow> for ChatMessage {
    fn from(row: MessageRow) -> Self {
        Self {
            id: row.id.parse().unwrap_or_default(),
            club_id: row.club_id,
            author_id: row.author_id,
            author_name: row.author_name,
            author_avatar: row.author_avatar,
            text: row.text,
            created_at: row.created_at.parse().unwrap_or_else(|_| Utc::now()),
            edited_at: row.edited_at.and_then(|t| t.parse().ok()),
            deleted: row.deleted != 0,
            deleted_by: row.deleted_by,
        }
    }
}

/// A user currently connected to a club's room.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnlineUser {
    pub user_id: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Server -> client event, broadcast to a club's room.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ChatEvent {
    /// A message was posted. Carries the full stored record.
    MessageCreated { message: ChatMessage },

    /// A message was edited in place. Carries the full updated record.
    MessageEdited { message: ChatMessage },

    /// A message was soft-deleted. Carries the full tombstone so clients
    /// reconcile without a secondary fetch.
    MessageDeleted { message: ChatMessage },

    /// The club's online-user list changed.
    OnlineUsers {
        club_id: String,
        users: Vec<OnlineUser>,
    },

    /// A member was removed from the club by the owner or an admin.
    MemberRemoved { club_id: String, user_id: String },

    /// A command from this client failed; directed at one session only.
    Error { message: String },
}

/// Client -> server command over the WebSocket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ClientCommand {
    /// Open a club's chat view: join its room and appear online.
    Join { club_id: String },

    /// Close the chat view.
    Leave { club_id: String },

    /// Post a message to a club.
    Send { club_id: String, text: String },

    /// Edit one of your own recent messages.
    Edit { message_id: String, text: String },

    /// Delete a message (author within the window, club owner, or admin).
    Delete { message_id: String },
}

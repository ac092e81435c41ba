use std::collections::HashSet;
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use dashmap::DashMap;
use sqlx::SqlitePool;
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::queries::{clubs, messages, users};
use crate::error::ChatError;

use super::events::{ChatEvent, ChatMessage, OnlineUser, SessionId};
use super::policy;
use super::presence::PresenceRegistry;
use super::rate_limiter::RateLimiter;
use super::user_session::{MAX_OUTBOUND_QUEUE, UserSession};
use super::validation;

/// The central hub for club chat. REST handlers and the WebSocket adapter
/// both call into this; it owns all in-process mutable state (sessions,
/// rooms, presence) while membership and messages live in the database.
///
/// Every operation is check-then-act: validation, then existence, then
/// authorization, and only then persistence and fan-out.
pub struct ChatEngine {
    /// All currently connected sessions, keyed by session ID.
    sessions: DashMap<SessionId, Arc<UserSession>>,
    /// Broadcast groups: club ID -> sessions currently in that club's room.
    rooms: DashMap<String, HashSet<SessionId>>,
    /// Who is online where, with per-(club, user) connection counts.
    presence: PresenceRegistry,
    db: SqlitePool,
    /// Per-user message send quota.
    send_limiter: RateLimiter,
}

impl ChatEngine {
    pub fn new(db: SqlitePool) -> Self {
        Self::with_send_quota(db, 10, 1.0)
    }

    pub fn with_send_quota(db: SqlitePool, burst: u32, refill_seconds: f64) -> Self {
        Self {
            sessions: DashMap::new(),
            rooms: DashMap::new(),
            presence: PresenceRegistry::new(),
            db,
            send_limiter: RateLimiter::new(burst, refill_seconds),
        }
    }

    // ── Session lifecycle ───────────────────────────────────────────

    /// Register a new connection. Returns the session ID and the receiver
    /// the transport adapter drains into its write loop. A user may hold
    /// any number of concurrent sessions (one per tab/device).
    pub fn connect(
        &self,
        user_id: String,
        display_name: String,
        avatar_url: Option<String>,
    ) -> (SessionId, mpsc::Receiver<ChatEvent>) {
        let session_id = Uuid::new_v4();
        let (tx, rx) = mpsc::channel(MAX_OUTBOUND_QUEUE);

        let session = Arc::new(UserSession::new(
            session_id,
            user_id.clone(),
            display_name,
            avatar_url,
            tx,
        ));
        self.sessions.insert(session_id, session);

        info!(%session_id, %user_id, "session connected");
        (session_id, rx)
    }

    /// Tear down a session: drop it from every room it joined and update
    /// presence per club. In-flight persistence is unaffected.
    pub fn disconnect(&self, session_id: SessionId) {
        let Some((_, session)) = self.sessions.remove(&session_id) else {
            return;
        };

        // Collect affected clubs first; mutating while iterating a DashMap
        // shard would deadlock.
        let joined: Vec<String> = self
            .rooms
            .iter()
            .filter(|room| room.value().contains(&session_id))
            .map(|room| room.key().clone())
            .collect();

        for club_id in &joined {
            if let Some(mut room) = self.rooms.get_mut(club_id) {
                room.remove(&session_id);
            }
            self.rooms.remove_if(club_id, |_, members| members.is_empty());

            self.presence.leave(club_id, &session.user_id);
            self.broadcast_online_users(club_id);
        }

        info!(%session_id, user_id = %session.user_id, "session disconnected");
    }

    // ── Room channel / presence ─────────────────────────────────────

    /// Join a club's room: the session starts receiving that club's events
    /// and the user appears in its online list. Idempotent per connection —
    /// re-joining the same room from the same session changes nothing.
    /// Presence does not require membership; lurkers can watch, not post.
    pub async fn join_room(
        &self,
        session_id: SessionId,
        club_id: &str,
    ) -> Result<Vec<OnlineUser>, ChatError> {
        let session = self
            .sessions
            .get(&session_id)
            .map(|s| s.clone())
            .ok_or(ChatError::NotFound("session"))?;

        clubs::get_club(&self.db, club_id)
            .await?
            .ok_or(ChatError::NotFound("club"))?;

        let newly_joined = {
            let mut room = self.rooms.entry(club_id.to_string()).or_default();
            room.insert(session_id)
        };

        if newly_joined {
            self.presence.join(club_id, &session.user_id);
        }

        let online = self.online_users(club_id);
        self.broadcast_to_room(
            club_id,
            &ChatEvent::OnlineUsers {
                club_id: club_id.to_string(),
                users: online.clone(),
            },
        );

        info!(user_id = %session.user_id, %club_id, "joined club room");
        Ok(online)
    }

    /// Leave a club's room. A no-op (with a diagnostic) if the session was
    /// not in it.
    pub fn leave_room(&self, session_id: SessionId, club_id: &str) {
        let Some(session) = self.sessions.get(&session_id).map(|s| s.clone()) else {
            warn!(%session_id, "leave_room for unknown session");
            return;
        };

        let was_member = {
            let Some(mut room) = self.rooms.get_mut(club_id) else {
                warn!(%club_id, "leave_room for unknown room");
                return;
            };
            room.remove(&session_id)
        };
        self.rooms.remove_if(club_id, |_, members| members.is_empty());

        if !was_member {
            warn!(user_id = %session.user_id, %club_id, "leave_room for a room not joined");
            return;
        }

        self.presence.leave(club_id, &session.user_id);
        self.broadcast_online_users(club_id);
        info!(user_id = %session.user_id, %club_id, "left club room");
    }

    /// Current online-user list for a club, enriched with display names
    /// from live sessions.
    pub fn online_users(&self, club_id: &str) -> Vec<OnlineUser> {
        self.presence
            .online_users(club_id)
            .into_iter()
            .map(|user_id| {
                let session = self
                    .sessions
                    .iter()
                    .find(|s| s.user_id == user_id)
                    .map(|s| s.clone());
                match session {
                    Some(s) => OnlineUser {
                        user_id,
                        display_name: s.display_name.clone(),
                        avatar_url: s.avatar_url.clone(),
                    },
                    None => OnlineUser {
                        user_id: user_id.clone(),
                        display_name: user_id,
                        avatar_url: None,
                    },
                }
            })
            .collect()
    }

    // ── The five core operations ────────────────────────────────────

    /// Post a message to a club. The author must be a current member; their
    /// display name and avatar are snapshotted onto the stored record.
    pub async fn send_message(
        &self,
        club_id: &str,
        user_id: &str,
        text: &str,
    ) -> Result<ChatMessage, ChatError> {
        validation::validate_message(text)?;

        if !self.send_limiter.allow(user_id) {
            return Err(ChatError::RateLimited);
        }

        clubs::get_club(&self.db, club_id)
            .await?
            .ok_or(ChatError::NotFound("club"))?;

        let is_member = clubs::is_member(&self.db, club_id, user_id).await?;
        policy::can_post(is_member)?;

        let author = users::get_user(&self.db, user_id)
            .await?
            .ok_or(ChatError::NotFound("user"))?;

        let message_id = Uuid::new_v4();
        let created_at = timestamp_now();
        let text = text.trim();

        messages::insert_message(
            &self.db,
            &messages::AppendMessage {
                message_id: &message_id.to_string(),
                club_id,
                author_id: user_id,
                author_name: &author.display_name,
                author_avatar: author.avatar_url.as_deref(),
                text,
                created_at: &created_at,
            },
        )
        .await?;

        let message = ChatMessage {
            id: message_id,
            club_id: club_id.to_string(),
            author_id: user_id.to_string(),
            author_name: author.display_name,
            author_avatar: author.avatar_url,
            text: text.to_string(),
            created_at: created_at.parse().unwrap_or_else(|_| Utc::now()),
            edited_at: None,
            deleted: false,
            deleted_by: None,
        };

        self.broadcast_to_room(
            club_id,
            &ChatEvent::MessageCreated {
                message: message.clone(),
            },
        );

        Ok(message)
    }

    /// Fetch a club's messages in ascending send order. `limit` defaults to
    /// 200 and is capped at 500.
    pub async fn list_messages(
        &self,
        club_id: &str,
        limit: Option<i64>,
    ) -> Result<Vec<ChatMessage>, ChatError> {
        clubs::get_club(&self.db, club_id)
            .await?
            .ok_or(ChatError::NotFound("club"))?;

        let rows = messages::list_by_club(&self.db, club_id, limit).await?;
        Ok(rows.into_iter().map(ChatMessage::from).collect())
    }

    /// Edit a message in place. Author-only, within the 5-minute window.
    pub async fn edit_message(
        &self,
        message_id: &str,
        user_id: &str,
        text: &str,
    ) -> Result<ChatMessage, ChatError> {
        validation::validate_message(text)?;

        let row = messages::get_message(&self.db, message_id)
            .await?
            .ok_or(ChatError::NotFound("message"))?;
        if row.deleted != 0 {
            // Deleted is terminal; tombstones are not editable.
            return Err(ChatError::NotFound("message"));
        }

        let created_at = row.created_at.parse().unwrap_or_else(|_| Utc::now());
        policy::can_edit(&row.author_id, user_id, created_at, Utc::now())?;

        let edited_at = timestamp_now();
        let text = text.trim();
        messages::update_text(&self.db, message_id, text, &edited_at).await?;

        let mut message = ChatMessage::from(row);
        message.text = text.to_string();
        message.edited_at = edited_at.parse().ok();

        self.broadcast_to_room(
            &message.club_id,
            &ChatEvent::MessageEdited {
                message: message.clone(),
            },
        );

        Ok(message)
    }

    /// Soft-delete a message, leaving a tombstone that records which role
    /// removed it. Admins and the club creator bypass the time window.
    pub async fn delete_message(
        &self,
        message_id: &str,
        actor_id: &str,
        actor_is_admin: bool,
    ) -> Result<ChatMessage, ChatError> {
        let row = messages::get_message(&self.db, message_id)
            .await?
            .ok_or(ChatError::NotFound("message"))?;
        if row.deleted != 0 {
            return Err(ChatError::NotFound("message"));
        }

        let club = clubs::get_club(&self.db, &row.club_id)
            .await?
            .ok_or(ChatError::NotFound("club"))?;

        let created_at = row.created_at.parse().unwrap_or_else(|_| Utc::now());
        let role = policy::delete_role(
            &row.author_id,
            created_at,
            &club.creator_id,
            actor_id,
            actor_is_admin,
            Utc::now(),
        )?;

        messages::soft_delete(&self.db, message_id, role.as_str()).await?;

        let mut tombstone = ChatMessage::from(row);
        tombstone.text = String::new();
        tombstone.deleted = true;
        tombstone.deleted_by = Some(role.as_str().to_string());

        self.broadcast_to_room(
            &tombstone.club_id,
            &ChatEvent::MessageDeleted {
                message: tombstone.clone(),
            },
        );

        Ok(tombstone)
    }

    /// Remove a member from a club. Owner/admin only; the creator is
    /// irremovable. Membership rows are the single source of truth, so the
    /// club also disappears from the target's joined-club list.
    pub async fn remove_member(
        &self,
        club_id: &str,
        actor_id: &str,
        actor_is_admin: bool,
        target_id: &str,
    ) -> Result<(), ChatError> {
        let club = clubs::get_club(&self.db, club_id)
            .await?
            .ok_or(ChatError::NotFound("club"))?;

        policy::can_remove_member(&club.creator_id, actor_id, actor_is_admin, target_id)?;

        let removed = clubs::remove_member(&self.db, club_id, target_id).await?;
        if !removed {
            return Err(ChatError::NotFound("club member"));
        }

        self.broadcast_to_room(
            club_id,
            &ChatEvent::MemberRemoved {
                club_id: club_id.to_string(),
                user_id: target_id.to_string(),
            },
        );

        info!(%club_id, %target_id, %actor_id, "member removed");
        Ok(())
    }

    // ── Admin ───────────────────────────────────────────────────────

    /// Hard-delete a message row entirely. Admin purge only — regular
    /// deletion always leaves a tombstone.
    pub async fn purge_message(&self, message_id: &str) -> Result<(), ChatError> {
        let row = messages::get_message(&self.db, message_id)
            .await?
            .ok_or(ChatError::NotFound("message"))?;

        messages::hard_delete(&self.db, message_id).await?;

        let club_id = row.club_id.clone();
        let tombstone = ChatMessage {
            text: String::new(),
            deleted: true,
            deleted_by: Some("admin".to_string()),
            ..ChatMessage::from(row)
        };
        self.broadcast_to_room(&club_id, &ChatEvent::MessageDeleted { message: tombstone });
        Ok(())
    }

    // ── Fan-out ─────────────────────────────────────────────────────

    /// Deliver an event to one session only (command errors, acks).
    pub fn send_to_session(&self, session_id: SessionId, event: ChatEvent) {
        if let Some(session) = self.sessions.get(&session_id) {
            session.send(event);
        }
    }

    /// Deliver an event to every session currently in a club's room.
    /// Best-effort: disconnected or slow clients miss it and resync via the
    /// history endpoint.
    fn broadcast_to_room(&self, club_id: &str, event: &ChatEvent) {
        let Some(room) = self.rooms.get(club_id) else {
            return;
        };

        for session_id in room.iter() {
            if let Some(session) = self.sessions.get(session_id)
                && !session.send(event.clone())
            {
                warn!(%session_id, "failed to send event to session (queue full or closed)");
            }
        }
    }

    fn broadcast_online_users(&self, club_id: &str) {
        let event = ChatEvent::OnlineUsers {
            club_id: club_id.to_string(),
            users: self.online_users(club_id),
        };
        self.broadcast_to_room(club_id, &event);
    }

    pub fn db(&self) -> &SqlitePool {
        &self.db
    }
}

/// Timestamps are stored as RFC 3339 with microseconds so that text ordering
/// matches time ordering.
fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::pool::{create_pool, run_migrations};
    use crate::db::queries::clubs::CreateClub;
    use crate::db::queries::users::CreateUser;

    /// Engine over a fresh in-memory database with one club ("c1", created
    /// by "owner") and members "owner" and "alice"; "mallory" is registered
    /// but not a member.
    async fn setup_engine() -> ChatEngine {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();

        for (id, name) in [("owner", "Olive"), ("alice", "Alice"), ("mallory", "Mallory")] {
            users::create_user(
                &pool,
                &CreateUser {
                    user_id: id,
                    username: id,
                    password_hash: "h",
                    display_name: name,
                    avatar_url: None,
                },
            )
            .await
            .unwrap();
        }

        clubs::create_club(
            &pool,
            &CreateClub {
                club_id: "c1",
                name: "Sci-fi Circle",
                description: None,
                book_title: "Solaris",
                book_author: Some("Stanislaw Lem"),
                creator_id: "owner",
            },
        )
        .await
        .unwrap();
        clubs::add_member(&pool, "c1", "owner").await.unwrap();
        clubs::add_member(&pool, "c1", "alice").await.unwrap();

        ChatEngine::new(pool)
    }

    /// Backdate a message so the edit window has expired.
    async fn expire_window(engine: &ChatEngine, message_id: &Uuid) {
        let old = (Utc::now() - chrono::Duration::seconds(policy::EDIT_WINDOW_SECS + 60))
            .to_rfc3339_opts(SecondsFormat::Micros, true);
        sqlx::query("UPDATE messages SET created_at = ? WHERE id = ?")
            .bind(&old)
            .bind(message_id.to_string())
            .execute(engine.db())
            .await
            .unwrap();
    }

    fn drain(rx: &mut mpsc::Receiver<ChatEvent>) {
        while rx.try_recv().is_ok() {}
    }

    #[tokio::test]
    async fn test_member_can_send_and_room_receives() {
        let engine = setup_engine().await;
        let (sid, mut rx) = engine.connect("alice".into(), "Alice".into(), None);
        engine.join_room(sid, "c1").await.unwrap();
        drain(&mut rx);

        let sent = engine.send_message("c1", "alice", "hello").await.unwrap();
        assert_eq!(sent.text, "hello");
        assert_eq!(sent.author_name, "Alice");
        assert!(!sent.deleted);

        match rx.try_recv().unwrap() {
            ChatEvent::MessageCreated { message } => assert_eq!(message.id, sent.id),
            other => panic!("Expected MessageCreated, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_member_cannot_send() {
        let engine = setup_engine().await;
        let err = engine.send_message("c1", "mallory", "hi").await.unwrap_err();
        assert!(matches!(err, ChatError::Permission(_)));
        assert!(engine.list_messages("c1", None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_send_to_missing_club_is_not_found() {
        let engine = setup_engine().await;
        let err = engine.send_message("ghost", "alice", "hi").await.unwrap_err();
        assert!(matches!(err, ChatError::NotFound("club")));
    }

    #[tokio::test]
    async fn test_empty_text_rejected_before_store() {
        let engine = setup_engine().await;
        let err = engine.send_message("c1", "alice", "   ").await.unwrap_err();
        assert!(matches!(err, ChatError::Validation(_)));
    }

    #[tokio::test]
    async fn test_list_returns_send_order() {
        let engine = setup_engine().await;
        for i in 0..5 {
            engine
                .send_message("c1", "alice", &format!("msg {i}"))
                .await
                .unwrap();
        }

        let msgs = engine.list_messages("c1", None).await.unwrap();
        assert_eq!(msgs.len(), 5);
        for (i, msg) in msgs.iter().enumerate() {
            assert_eq!(msg.text, format!("msg {i}"));
        }
    }

    #[tokio::test]
    async fn test_edit_within_window() {
        let engine = setup_engine().await;
        let sent = engine.send_message("c1", "alice", "hello").await.unwrap();

        let edited = engine
            .edit_message(&sent.id.to_string(), "alice", "hello world")
            .await
            .unwrap();
        assert_eq!(edited.text, "hello world");
        assert!(edited.edited_at.is_some());
    }

    #[tokio::test]
    async fn test_edit_after_window_fails() {
        let engine = setup_engine().await;
        let sent = engine.send_message("c1", "alice", "hello").await.unwrap();
        expire_window(&engine, &sent.id).await;

        let err = engine
            .edit_message(&sent.id.to_string(), "alice", "too late")
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::Permission(_)));
    }

    #[tokio::test]
    async fn test_edit_by_non_author_fails() {
        let engine = setup_engine().await;
        let sent = engine.send_message("c1", "alice", "hello").await.unwrap();

        let err = engine
            .edit_message(&sent.id.to_string(), "owner", "hijacked")
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::Permission(_)));
    }

    #[tokio::test]
    async fn test_delete_leaves_broadcast_tombstone() {
        let engine = setup_engine().await;
        let (sid, mut rx) = engine.connect("owner".into(), "Olive".into(), None);
        engine.join_room(sid, "c1").await.unwrap();

        let sent = engine.send_message("c1", "alice", "oops").await.unwrap();
        drain(&mut rx);

        let tombstone = engine
            .delete_message(&sent.id.to_string(), "alice", false)
            .await
            .unwrap();
        assert!(tombstone.deleted);
        assert_eq!(tombstone.deleted_by.as_deref(), Some("self"));
        assert_eq!(tombstone.text, "");

        match rx.try_recv().unwrap() {
            ChatEvent::MessageDeleted { message } => {
                assert_eq!(message.id, sent.id);
                assert!(message.deleted);
            }
            other => panic!("Expected MessageDeleted, got {:?}", other),
        }

        // The tombstone still occupies its slot in history.
        let msgs = engine.list_messages("c1", None).await.unwrap();
        assert_eq!(msgs.len(), 1);
        assert!(msgs[0].deleted);
    }

    #[tokio::test]
    async fn test_creator_deletes_late_message() {
        let engine = setup_engine().await;
        let sent = engine.send_message("c1", "alice", "old").await.unwrap();
        expire_window(&engine, &sent.id).await;

        let tombstone = engine
            .delete_message(&sent.id.to_string(), "owner", false)
            .await
            .unwrap();
        assert_eq!(tombstone.deleted_by.as_deref(), Some("club-owner"));
    }

    #[tokio::test]
    async fn test_admin_deletes_anywhere() {
        let engine = setup_engine().await;
        let sent = engine.send_message("c1", "alice", "anything").await.unwrap();
        expire_window(&engine, &sent.id).await;

        // mallory is not a member, but carries the admin flag.
        let tombstone = engine
            .delete_message(&sent.id.to_string(), "mallory", true)
            .await
            .unwrap();
        assert_eq!(tombstone.deleted_by.as_deref(), Some("admin"));
    }

    #[tokio::test]
    async fn test_deleted_message_is_terminal() {
        let engine = setup_engine().await;
        let sent = engine.send_message("c1", "alice", "gone").await.unwrap();
        let id = sent.id.to_string();

        engine.delete_message(&id, "alice", false).await.unwrap();

        let edit = engine.edit_message(&id, "alice", "resurrect").await;
        assert!(matches!(edit, Err(ChatError::NotFound("message"))));

        let second_delete = engine.delete_message(&id, "alice", false).await;
        assert!(matches!(second_delete, Err(ChatError::NotFound("message"))));
    }

    #[tokio::test]
    async fn test_remove_member_owner_only() {
        let engine = setup_engine().await;

        let err = engine
            .remove_member("c1", "alice", false, "owner")
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::Permission(_)));

        engine
            .remove_member("c1", "owner", false, "alice")
            .await
            .unwrap();
        assert!(!clubs::is_member(engine.db(), "c1", "alice").await.unwrap());
    }

    #[tokio::test]
    async fn test_creator_cannot_be_removed_even_by_admin() {
        let engine = setup_engine().await;
        let err = engine
            .remove_member("c1", "mallory", true, "owner")
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::Permission(_)));
        assert!(clubs::is_member(engine.db(), "c1", "owner").await.unwrap());
    }

    #[tokio::test]
    async fn test_join_room_is_idempotent_per_connection() {
        let engine = setup_engine().await;
        let (sid, _rx) = engine.connect("alice".into(), "Alice".into(), None);

        let online = engine.join_room(sid, "c1").await.unwrap();
        assert_eq!(online.len(), 1);

        // Same (club, user, connection) joining again: same online set.
        let online = engine.join_room(sid, "c1").await.unwrap();
        assert_eq!(online.len(), 1);

        // One leave fully removes the user.
        engine.leave_room(sid, "c1");
        assert!(engine.online_users("c1").is_empty());
    }

    #[tokio::test]
    async fn test_two_tabs_one_user_presence() {
        let engine = setup_engine().await;
        let (tab1, _rx1) = engine.connect("alice".into(), "Alice".into(), None);
        let (tab2, _rx2) = engine.connect("alice".into(), "Alice".into(), None);

        engine.join_room(tab1, "c1").await.unwrap();
        engine.join_room(tab2, "c1").await.unwrap();
        assert_eq!(engine.online_users("c1").len(), 1);

        engine.disconnect(tab1);
        assert_eq!(engine.online_users("c1").len(), 1, "still one tab open");

        engine.disconnect(tab2);
        assert!(engine.online_users("c1").is_empty());
    }

    #[tokio::test]
    async fn test_presence_does_not_require_membership() {
        let engine = setup_engine().await;
        let (sid, _rx) = engine.connect("mallory".into(), "Mallory".into(), None);

        // Watching is allowed...
        let online = engine.join_room(sid, "c1").await.unwrap();
        assert_eq!(online[0].user_id, "mallory");

        // ...posting is not.
        let err = engine.send_message("c1", "mallory", "hi").await.unwrap_err();
        assert!(matches!(err, ChatError::Permission(_)));
    }

    #[tokio::test]
    async fn test_send_rate_limited() {
        let pool = {
            let engine = setup_engine().await;
            engine.db().clone()
        };
        let engine = ChatEngine::with_send_quota(pool, 2, 60.0);

        engine.send_message("c1", "alice", "one").await.unwrap();
        engine.send_message("c1", "alice", "two").await.unwrap();
        let err = engine.send_message("c1", "alice", "three").await.unwrap_err();
        assert!(matches!(err, ChatError::RateLimited));
    }

    #[tokio::test]
    async fn test_purge_removes_row() {
        let engine = setup_engine().await;
        let sent = engine.send_message("c1", "alice", "purge me").await.unwrap();

        engine.purge_message(&sent.id.to_string()).await.unwrap();
        assert!(engine.list_messages("c1", None).await.unwrap().is_empty());

        let err = engine.purge_message(&sent.id.to_string()).await.unwrap_err();
        assert!(matches!(err, ChatError::NotFound("message")));
    }
}

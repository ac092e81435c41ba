use serde::{Deserialize, Serialize};

/// A stored user account.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserRow {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub is_admin: i32,
    pub created_at: String,
}

/// A stored reading club. Book title/author are a snapshot of the
/// featured book, not a live catalog reference.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ClubRow {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub book_title: String,
    pub book_author: Option<String>,
    pub creator_id: String,
    pub created_at: String,
}

/// A club member joined with their user profile, for member lists.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MemberProfileRow {
    pub user_id: String,
    pub username: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub joined_at: String,
}

/// A stored chat message. Author name/avatar are denormalized at send
/// time. `deleted` rows are tombstones: text is blanked and `deleted_by`
/// records which role removed it ("self", "club-owner", or "admin").
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MessageRow {
    pub id: String,
    pub club_id: String,
    pub author_id: String,
    pub author_name: String,
    pub author_avatar: Option<String>,
    pub text: String,
    pub created_at: String,
    pub edited_at: Option<String>,
    pub deleted: i32,
    pub deleted_by: Option<String>,
}

use sqlx::SqlitePool;

use crate::db::models::MessageRow;

/// Default number of messages returned by a history fetch.
pub const DEFAULT_HISTORY_LIMIT: i64 = 200;

/// Hard ceiling on a history fetch, regardless of what the caller asks for.
pub const MAX_HISTORY_LIMIT: i64 = 500;

/// Parameters for appending a message (avoids too-many-arguments).
pub struct AppendMessage<'a> {
    pub message_id: &'a str,
    pub club_id: &'a str,
    pub author_id: &'a str,
    pub author_name: &'a str,
    pub author_avatar: Option<&'a str>,
    pub text: &'a str,
    pub created_at: &'a str,
}

/// Append a new chat message.
pub async fn insert_message(
    pool: &SqlitePool,
    params: &AppendMessage<'_>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO messages (id, club_id, author_id, author_name, author_avatar, text, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(params.message_id)
    .bind(params.club_id)
    .bind(params.author_id)
    .bind(params.author_name)
    .bind(params.author_avatar)
    .bind(params.text)
    .bind(params.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn get_message(
    pool: &SqlitePool,
    message_id: &str,
) -> Result<Option<MessageRow>, sqlx::Error> {
    sqlx::query_as::<_, MessageRow>(
        "SELECT id, club_id, author_id, author_name, author_avatar, text, created_at, \
                edited_at, deleted, deleted_by \
         FROM messages WHERE id = ?",
    )
    .bind(message_id)
    .fetch_optional(pool)
    .await
}

/// Fetch a club's messages in ascending send order. The limit is clamped
/// to [1, MAX_HISTORY_LIMIT]. Ties on created_at are broken by rowid so
/// same-timestamp inserts keep their send order.
pub async fn list_by_club(
    pool: &SqlitePool,
    club_id: &str,
    limit: Option<i64>,
) -> Result<Vec<MessageRow>, sqlx::Error> {
    let limit = limit.unwrap_or(DEFAULT_HISTORY_LIMIT).clamp(1, MAX_HISTORY_LIMIT);
    sqlx::query_as::<_, MessageRow>(
        "SELECT id, club_id, author_id, author_name, author_avatar, text, created_at, \
                edited_at, deleted, deleted_by \
         FROM messages WHERE club_id = ? \
         ORDER BY created_at ASC, rowid ASC \
         LIMIT ?",
    )
    .bind(club_id)
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// In-place text edit, stamping edited_at.
pub async fn update_text(
    pool: &SqlitePool,
    message_id: &str,
    new_text: &str,
    edited_at: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE messages SET text = ?, edited_at = ? WHERE id = ?")
        .bind(new_text)
        .bind(edited_at)
        .bind(message_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Soft delete: retain the row as a tombstone, blank the text, and record
/// which role removed it ("self", "club-owner", or "admin").
pub async fn soft_delete(
    pool: &SqlitePool,
    message_id: &str,
    deleted_by: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE messages SET deleted = 1, deleted_by = ?, text = '' WHERE id = ?")
        .bind(deleted_by)
        .bind(message_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Hard delete (admin purge). Irrecoverable.
pub async fn hard_delete(pool: &SqlitePool, message_id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM messages WHERE id = ?")
        .bind(message_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn count_by_club(pool: &SqlitePool, club_id: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM messages WHERE club_id = ?")
        .bind(club_id)
        .fetch_one(pool)
        .await
}

use sqlx::SqlitePool;

use crate::db::models::{ClubRow, MemberProfileRow};

/// Parameters for creating a club (avoids too-many-arguments).
pub struct CreateClub<'a> {
    pub club_id: &'a str,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub book_title: &'a str,
    pub book_author: Option<&'a str>,
    pub creator_id: &'a str,
}

pub async fn create_club(pool: &SqlitePool, params: &CreateClub<'_>) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO clubs (id, name, description, book_title, book_author, creator_id) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(params.club_id)
    .bind(params.name)
    .bind(params.description)
    .bind(params.book_title)
    .bind(params.book_author)
    .bind(params.creator_id)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn get_club(pool: &SqlitePool, club_id: &str) -> Result<Option<ClubRow>, sqlx::Error> {
    sqlx::query_as::<_, ClubRow>(
        "SELECT id, name, description, book_title, book_author, creator_id, created_at \
         FROM clubs WHERE id = ?",
    )
    .bind(club_id)
    .fetch_optional(pool)
    .await
}

pub async fn list_clubs(pool: &SqlitePool) -> Result<Vec<ClubRow>, sqlx::Error> {
    sqlx::query_as::<_, ClubRow>(
        "SELECT id, name, description, book_title, book_author, creator_id, created_at \
         FROM clubs ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await
}

pub async fn list_clubs_for_user(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Vec<ClubRow>, sqlx::Error> {
    sqlx::query_as::<_, ClubRow>(
        "SELECT c.id, c.name, c.description, c.book_title, c.book_author, c.creator_id, c.created_at \
         FROM clubs c JOIN club_members m ON m.club_id = c.id \
         WHERE m.user_id = ? ORDER BY m.joined_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn delete_club(pool: &SqlitePool, club_id: &str) -> Result<(), sqlx::Error> {
    // Memberships and messages go with the club (ON DELETE CASCADE).
    sqlx::query("DELETE FROM clubs WHERE id = ?")
        .bind(club_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Add a member. A single INSERT OR IGNORE, so concurrent joins cannot
/// lose updates the way a fetch-then-save member list would.
pub async fn add_member(
    pool: &SqlitePool,
    club_id: &str,
    user_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT OR IGNORE INTO club_members (club_id, user_id) VALUES (?, ?)")
        .bind(club_id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Remove a member. Returns false if they were not a member. The join
/// table is the single source of truth for membership in both directions,
/// so removal also removes the club from the user's joined-club list.
pub async fn remove_member(
    pool: &SqlitePool,
    club_id: &str,
    user_id: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM club_members WHERE club_id = ? AND user_id = ?")
        .bind(club_id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn is_member(
    pool: &SqlitePool,
    club_id: &str,
    user_id: &str,
) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM club_members WHERE club_id = ? AND user_id = ?",
    )
    .bind(club_id)
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

pub async fn list_members(
    pool: &SqlitePool,
    club_id: &str,
) -> Result<Vec<MemberProfileRow>, sqlx::Error> {
    sqlx::query_as::<_, MemberProfileRow>(
        "SELECT u.id AS user_id, u.username, u.display_name, u.avatar_url, m.joined_at \
         FROM club_members m JOIN users u ON u.id = m.user_id \
         WHERE m.club_id = ? ORDER BY m.joined_at ASC",
    )
    .bind(club_id)
    .fetch_all(pool)
    .await
}

pub async fn member_count(pool: &SqlitePool, club_id: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM club_members WHERE club_id = ?")
        .bind(club_id)
        .fetch_one(pool)
        .await
}

use sqlx::SqlitePool;

use crate::db::models::UserRow;

/// Parameters for creating a user (avoids too-many-arguments).
pub struct CreateUser<'a> {
    pub user_id: &'a str,
    pub username: &'a str,
    pub password_hash: &'a str,
    pub display_name: &'a str,
    pub avatar_url: Option<&'a str>,
}

pub async fn create_user(pool: &SqlitePool, params: &CreateUser<'_>) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO users (id, username, password_hash, display_name, avatar_url) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(params.user_id)
    .bind(params.username)
    .bind(params.password_hash)
    .bind(params.display_name)
    .bind(params.avatar_url)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn get_user(pool: &SqlitePool, user_id: &str) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>(
        "SELECT id, username, password_hash, display_name, avatar_url, is_admin, created_at \
         FROM users WHERE id = ?",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub async fn find_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>(
        "SELECT id, username, password_hash, display_name, avatar_url, is_admin, created_at \
         FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await
}

pub async fn is_admin(pool: &SqlitePool, user_id: &str) -> Result<bool, sqlx::Error> {
    let admin: Option<i32> = sqlx::query_scalar("SELECT is_admin FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(admin.unwrap_or(0) != 0)
}

pub async fn set_admin(
    pool: &SqlitePool,
    user_id: &str,
    is_admin: bool,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE users SET is_admin = ? WHERE id = ?")
        .bind(if is_admin { 1 } else { 0 })
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::pool::{create_pool, run_migrations};

    async fn setup_db() -> SqlitePool {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        pool
    }

    async fn insert_user(pool: &SqlitePool, id: &str, username: &str) {
        create_user(
            pool,
            &CreateUser {
                user_id: id,
                username,
                password_hash: "$argon2$fake",
                display_name: username,
                avatar_url: None,
            },
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_create_and_get_user() {
        let pool = setup_db().await;
        insert_user(&pool, "u1", "alice").await;

        let user = get_user(&pool, "u1").await.unwrap().unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.is_admin, 0);
    }

    #[tokio::test]
    async fn test_username_unique() {
        let pool = setup_db().await;
        insert_user(&pool, "u1", "alice").await;

        let dup = create_user(
            &pool,
            &CreateUser {
                user_id: "u2",
                username: "alice",
                password_hash: "h",
                display_name: "Other Alice",
                avatar_url: None,
            },
        )
        .await;
        assert!(dup.is_err());
    }

    #[tokio::test]
    async fn test_find_by_username() {
        let pool = setup_db().await;
        create_user(
            &pool,
            &CreateUser {
                user_id: "u1",
                username: "bob",
                password_hash: "h",
                display_name: "Bob",
                avatar_url: Some("https://example.com/bob.png"),
            },
        )
        .await
        .unwrap();

        let user = find_by_username(&pool, "bob").await.unwrap().unwrap();
        assert_eq!(user.id, "u1");
        assert_eq!(
            user.avatar_url.as_deref(),
            Some("https://example.com/bob.png")
        );

        assert!(find_by_username(&pool, "nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_and_check_admin() {
        let pool = setup_db().await;
        insert_user(&pool, "u1", "alice").await;

        assert!(!is_admin(&pool, "u1").await.unwrap());
        assert!(set_admin(&pool, "u1", true).await.unwrap());
        assert!(is_admin(&pool, "u1").await.unwrap());
        assert!(set_admin(&pool, "u1", false).await.unwrap());
        assert!(!is_admin(&pool, "u1").await.unwrap());
    }

    #[tokio::test]
    async fn test_set_admin_unknown_user() {
        let pool = setup_db().await;
        assert!(!set_admin(&pool, "nosuch", true).await.unwrap());
        assert!(!is_admin(&pool, "nosuch").await.unwrap());
    }
}

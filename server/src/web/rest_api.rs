use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::Cookie;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::token::{create_session_token, hash_password, verify_password};
use crate::db::models::{ClubRow, UserRow};
use crate::db::queries::{clubs, users};
use crate::engine::{policy, validation};
use crate::error::ChatError;

use super::app_state::AppState;
use super::auth_middleware::{AuthUser, SESSION_COOKIE};

// ── Auth ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub is_admin: bool,
}

impl From<UserRow> for UserResponse {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            display_name: row.display_name,
            avatar_url: row.avatar_url,
            is_admin: row.is_admin != 0,
        }
    }
}

fn session_cookie(state: &AppState, user_id: &str) -> Result<Cookie<'static>, ChatError> {
    let token = create_session_token(
        user_id,
        &state.auth_config.jwt_secret,
        state.auth_config.session_expiry_hours,
    )
    .map_err(|e| ChatError::Internal(format!("failed to sign session token: {e}")))?;

    Ok(Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .build())
}

/// POST /api/auth/register — create an account and start a session.
pub async fn register(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(body): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ChatError> {
    validation::validate_username(&body.username)?;
    validation::validate_password(&body.password)?;
    let display_name = body.display_name.unwrap_or_else(|| body.username.clone());
    validation::validate_display_name(&display_name)?;

    if users::find_by_username(&state.db, &body.username)
        .await?
        .is_some()
    {
        return Err(ChatError::validation("username already taken"));
    }

    let user_id = Uuid::new_v4().to_string();
    let password_hash = hash_password(&body.password)
        .map_err(|e| ChatError::Internal(format!("failed to hash password: {e}")))?;

    users::create_user(
        &state.db,
        &users::CreateUser {
            user_id: &user_id,
            username: &body.username,
            password_hash: &password_hash,
            display_name: &display_name,
            avatar_url: body.avatar_url.as_deref(),
        },
    )
    .await?;

    info!(%user_id, username = %body.username, "user registered");

    let user = users::get_user(&state.db, &user_id)
        .await?
        .ok_or(ChatError::NotFound("user"))?;
    let jar = jar.add(session_cookie(&state, &user_id)?);
    Ok((StatusCode::CREATED, jar, Json(UserResponse::from(user))))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, ChatError> {
    let user = users::find_by_username(&state.db, &body.username)
        .await?
        .ok_or_else(|| ChatError::unauthorized("invalid username or password"))?;

    if !verify_password(&body.password, &user.password_hash) {
        return Err(ChatError::unauthorized("invalid username or password"));
    }

    let jar = jar.add(session_cookie(&state, &user.id)?);
    Ok((jar, Json(UserResponse::from(user))))
}

/// POST /api/auth/logout
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/").build());
    (jar, StatusCode::NO_CONTENT)
}

/// GET /api/me
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<UserResponse>, ChatError> {
    let user = users::get_user(&state.db, &auth.user_id)
        .await?
        .ok_or(ChatError::NotFound("user"))?;
    Ok(Json(UserResponse::from(user)))
}

// ── Clubs ───────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateClubRequest {
    pub name: String,
    pub description: Option<String>,
    pub book_title: String,
    pub book_author: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClubResponse {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub book_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book_author: Option<String>,
    pub creator_id: String,
    pub member_count: i64,
    pub created_at: String,
}

impl ClubResponse {
    fn from_row(row: ClubRow, member_count: i64) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            book_title: row.book_title,
            book_author: row.book_author,
            creator_id: row.creator_id,
            member_count,
            created_at: row.created_at,
        }
    }
}

#[derive(Deserialize)]
pub struct ClubListParams {
    /// When true, only clubs the current user has joined.
    pub mine: Option<bool>,
}

/// POST /api/clubs — create a club; the creator becomes owner and member.
pub async fn create_club(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<CreateClubRequest>,
) -> Result<impl IntoResponse, ChatError> {
    validation::validate_club_name(&body.name)?;
    if body.book_title.trim().is_empty() {
        return Err(ChatError::validation("a club needs a featured book"));
    }

    let club_id = Uuid::new_v4().to_string();
    clubs::create_club(
        &state.db,
        &clubs::CreateClub {
            club_id: &club_id,
            name: &body.name,
            description: body.description.as_deref(),
            book_title: &body.book_title,
            book_author: body.book_author.as_deref(),
            creator_id: &auth.user_id,
        },
    )
    .await?;
    clubs::add_member(&state.db, &club_id, &auth.user_id).await?;

    info!(%club_id, creator = %auth.user_id, "club created");

    let club = clubs::get_club(&state.db, &club_id)
        .await?
        .ok_or(ChatError::NotFound("club"))?;
    Ok((StatusCode::CREATED, Json(ClubResponse::from_row(club, 1))))
}

/// GET /api/clubs — all clubs, or only the caller's with ?mine=true.
pub async fn list_clubs(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Query(params): Query<ClubListParams>,
) -> Result<Json<Vec<ClubResponse>>, ChatError> {
    let rows = if params.mine.unwrap_or(false) {
        clubs::list_clubs_for_user(&state.db, &auth.user_id).await?
    } else {
        clubs::list_clubs(&state.db).await?
    };

    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let count = clubs::member_count(&state.db, &row.id).await?;
        out.push(ClubResponse::from_row(row, count));
    }
    Ok(Json(out))
}

/// GET /api/clubs/{id}
pub async fn get_club(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(club_id): Path<String>,
) -> Result<Json<ClubResponse>, ChatError> {
    let club = clubs::get_club(&state.db, &club_id)
        .await?
        .ok_or(ChatError::NotFound("club"))?;
    let count = clubs::member_count(&state.db, &club_id).await?;
    Ok(Json(ClubResponse::from_row(club, count)))
}

/// DELETE /api/clubs/{id} — creator or admin only. Members and messages
/// cascade away with the club.
pub async fn delete_club(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(club_id): Path<String>,
) -> Result<StatusCode, ChatError> {
    let club = clubs::get_club(&state.db, &club_id)
        .await?
        .ok_or(ChatError::NotFound("club"))?;

    let actor_is_admin = users::is_admin(&state.db, &auth.user_id).await?;
    if club.creator_id != auth.user_id && !actor_is_admin {
        return Err(ChatError::permission(
            "only the club owner or an admin can delete a club",
        ));
    }

    clubs::delete_club(&state.db, &club_id).await?;
    info!(%club_id, actor = %auth.user_id, "club deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/clubs/{id}/join — idempotent.
pub async fn join_club(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(club_id): Path<String>,
) -> Result<StatusCode, ChatError> {
    clubs::get_club(&state.db, &club_id)
        .await?
        .ok_or(ChatError::NotFound("club"))?;

    clubs::add_member(&state.db, &club_id, &auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/clubs/{id}/leave — anyone but the creator.
pub async fn leave_club(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(club_id): Path<String>,
) -> Result<StatusCode, ChatError> {
    let club = clubs::get_club(&state.db, &club_id)
        .await?
        .ok_or(ChatError::NotFound("club"))?;

    policy::can_leave(&club.creator_id, &auth.user_id)?;

    clubs::remove_member(&state.db, &club_id, &auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/clubs/{id}/members
pub async fn list_club_members(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(club_id): Path<String>,
) -> Result<impl IntoResponse, ChatError> {
    clubs::get_club(&state.db, &club_id)
        .await?
        .ok_or(ChatError::NotFound("club"))?;

    let members = clubs::list_members(&state.db, &club_id).await?;
    Ok(Json(members))
}

/// GET /api/clubs/{id}/online — who currently has the chat view open.
pub async fn list_online_users(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(club_id): Path<String>,
) -> Result<impl IntoResponse, ChatError> {
    clubs::get_club(&state.db, &club_id)
        .await?
        .ok_or(ChatError::NotFound("club"))?;

    Ok(Json(state.engine.online_users(&club_id)))
}

/// DELETE /api/clubs/{id}/members/{user_id} — owner/admin removes a member.
pub async fn remove_member(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path((club_id, target_id)): Path<(String, String)>,
) -> Result<StatusCode, ChatError> {
    let actor_is_admin = users::is_admin(&state.db, &auth.user_id).await?;
    state
        .engine
        .remove_member(&club_id, &auth.user_id, actor_is_admin, &target_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── Messages ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct MessageBody {
    pub text: String,
}

#[derive(Deserialize)]
pub struct HistoryParams {
    pub limit: Option<i64>,
}

/// POST /api/clubs/{id}/messages
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(club_id): Path<String>,
    Json(body): Json<MessageBody>,
) -> Result<impl IntoResponse, ChatError> {
    let message = state
        .engine
        .send_message(&club_id, &auth.user_id, &body.text)
        .await?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// GET /api/clubs/{id}/messages?limit=N
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(club_id): Path<String>,
    Query(params): Query<HistoryParams>,
) -> Result<impl IntoResponse, ChatError> {
    let messages = state.engine.list_messages(&club_id, params.limit).await?;
    Ok(Json(messages))
}

/// PATCH /api/messages/{id}
pub async fn edit_message(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(message_id): Path<String>,
    Json(body): Json<MessageBody>,
) -> Result<impl IntoResponse, ChatError> {
    let message = state
        .engine
        .edit_message(&message_id, &auth.user_id, &body.text)
        .await?;
    Ok(Json(message))
}

/// DELETE /api/messages/{id} — soft delete; returns the tombstone.
pub async fn delete_message(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(message_id): Path<String>,
) -> Result<impl IntoResponse, ChatError> {
    let actor_is_admin = users::is_admin(&state.db, &auth.user_id).await?;
    let tombstone = state
        .engine
        .delete_message(&message_id, &auth.user_id, actor_is_admin)
        .await?;
    Ok(Json(tombstone))
}

// ── Admin ───────────────────────────────────────────────────────

async fn require_admin(state: &AppState, user_id: &str) -> Result<(), ChatError> {
    if users::is_admin(&state.db, user_id).await? {
        Ok(())
    } else {
        Err(ChatError::permission("admin access required"))
    }
}

/// DELETE /api/admin/messages/{id} — hard purge, removes the row entirely.
pub async fn admin_purge_message(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(message_id): Path<String>,
) -> Result<StatusCode, ChatError> {
    require_admin(&state, &auth.user_id).await?;
    state.engine.purge_message(&message_id).await?;
    info!(%message_id, actor = %auth.user_id, "message purged");
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct SetAdminRequest {
    pub is_admin: bool,
}

/// PUT /api/admin/users/{id}/admin — grant or revoke platform admin.
pub async fn admin_set_admin(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(user_id): Path<String>,
    Json(body): Json<SetAdminRequest>,
) -> Result<StatusCode, ChatError> {
    require_admin(&state, &auth.user_id).await?;

    if !users::set_admin(&state.db, &user_id, body.is_admin).await? {
        return Err(ChatError::NotFound("user"));
    }
    info!(%user_id, is_admin = body.is_admin, actor = %auth.user_id, "admin flag updated");
    Ok(StatusCode::NO_CONTENT)
}

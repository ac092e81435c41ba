use std::sync::Arc;

use axum::Router;
use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};

use super::app_state::AppState;
use super::{rest_api, ws_handler};

/// Build the axum router with all HTTP and WebSocket routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    // Restrict CORS to the configured public_url origin (or allow any for localhost dev)
    let public_url = &state.auth_config.public_url;
    let cors = if public_url.contains("localhost") || public_url.contains("127.0.0.1") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origin = public_url
            .parse::<HeaderValue>()
            .unwrap_or_else(|_| HeaderValue::from_static("https://localhost"));
        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let auth_routes = Router::new()
        .route("/api/auth/register", axum::routing::post(rest_api::register))
        .route("/api/auth/login", axum::routing::post(rest_api::login))
        .route("/api/auth/logout", axum::routing::post(rest_api::logout))
        .route("/api/me", axum::routing::get(rest_api::get_me));

    let club_routes = Router::new()
        .route(
            "/api/clubs",
            axum::routing::get(rest_api::list_clubs).post(rest_api::create_club),
        )
        .route(
            "/api/clubs/{id}",
            axum::routing::get(rest_api::get_club).delete(rest_api::delete_club),
        )
        .route("/api/clubs/{id}/join", axum::routing::post(rest_api::join_club))
        .route("/api/clubs/{id}/leave", axum::routing::post(rest_api::leave_club))
        .route(
            "/api/clubs/{id}/members",
            axum::routing::get(rest_api::list_club_members),
        )
        .route(
            "/api/clubs/{id}/members/{user_id}",
            axum::routing::delete(rest_api::remove_member),
        )
        .route(
            "/api/clubs/{id}/online",
            axum::routing::get(rest_api::list_online_users),
        );

    let message_routes = Router::new()
        .route(
            "/api/clubs/{id}/messages",
            axum::routing::get(rest_api::list_messages).post(rest_api::send_message),
        )
        .route(
            "/api/messages/{id}",
            axum::routing::patch(rest_api::edit_message).delete(rest_api::delete_message),
        );

    let admin_routes = Router::new()
        .route(
            "/api/admin/messages/{id}",
            axum::routing::delete(rest_api::admin_purge_message),
        )
        .route(
            "/api/admin/users/{id}/admin",
            axum::routing::put(rest_api::admin_set_admin),
        );

    let ws_routes = Router::new().route("/ws", axum::routing::get(ws_handler::ws_upgrade));

    Router::new()
        .merge(ws_routes)
        .merge(auth_routes)
        .merge(club_routes)
        .merge(message_routes)
        .merge(admin_routes)
        .layer(cors)
        .with_state(state)
}

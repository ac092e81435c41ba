use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use clublit_server::config::ServerConfig;
use clublit_server::db::pool::{create_pool, run_migrations};
use clublit_server::db::queries::users;
use clublit_server::engine::chat_engine::ChatEngine;
use clublit_server::web::app_state::AppState;
use clublit_server::web::router::build_router;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::load("clublit.toml");

    // Initialize database
    let pool = create_pool(&config.database.url)
        .await
        .expect("failed to connect to database");

    run_migrations(&pool)
        .await
        .expect("failed to run database migrations");

    // Auto-promote configured admin accounts (they must register first).
    for username in &config.admin.admin_users {
        match users::find_by_username(&pool, username).await {
            Ok(Some(user)) => {
                if users::set_admin(&pool, &user.id, true).await.is_ok() {
                    info!(%username, "promoted to platform admin");
                }
            }
            Ok(None) => warn!(%username, "admin user not registered yet, skipping"),
            Err(e) => warn!(%username, error = %e, "failed to look up admin user"),
        }
    }

    // Create the shared chat engine
    let engine = Arc::new(ChatEngine::with_send_quota(
        pool.clone(),
        config.chat.send_burst,
        config.chat.send_refill_seconds,
    ));

    // Build shared app state for the web server
    let app_state = Arc::new(AppState {
        engine,
        db: pool,
        auth_config: config.to_auth_config(),
    });

    let app = build_router(app_state);

    let web_addr = &config.server.web_address;
    info!("Club Lit server starting on {}", web_addr);

    let listener = tokio::net::TcpListener::bind(web_addr)
        .await
        .expect("failed to bind web listener");

    axum::serve(listener, app)
        .await
        .expect("server error");
}

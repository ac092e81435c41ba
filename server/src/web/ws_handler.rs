use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use futures_util::{SinkExt, StreamExt};
use tracing::{debug, info};

use crate::db::models::UserRow;
use crate::db::queries::users;
use crate::engine::events::{ChatEvent, ClientCommand, SessionId};
use crate::error::ChatError;

use super::app_state::AppState;
use super::auth_middleware::AuthUser;

/// GET /ws — upgrade an authenticated connection into a chat session.
pub async fn ws_upgrade(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ws: WebSocketUpgrade,
) -> Result<Response, ChatError> {
    let user = users::get_user(&state.db, &auth.user_id)
        .await?
        .ok_or(ChatError::NotFound("user"))?;

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, user)))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, user: UserRow) {
    let (session_id, mut rx) = state.engine.connect(
        user.id.clone(),
        user.display_name.clone(),
        user.avatar_url.clone(),
    );

    let (mut sender, mut receiver) = socket.split();

    // Forward engine events to the socket until either side closes.
    let send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let Ok(json) = serde_json::to_string(&event) else {
                continue;
            };
            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(msg)) = receiver.next().await {
        let Message::Text(text) = msg else {
            continue;
        };

        let command = match serde_json::from_str::<ClientCommand>(&text) {
            Ok(command) => command,
            Err(err) => {
                debug!(%err, "unparseable client command");
                state.engine.send_to_session(
                    session_id,
                    ChatEvent::Error {
                        message: "unrecognized command".into(),
                    },
                );
                continue;
            }
        };

        if let Err(err) = dispatch(&state, session_id, &user, command).await {
            state.engine.send_to_session(
                session_id,
                ChatEvent::Error {
                    message: err.to_string(),
                },
            );
        }
    }

    send_task.abort();
    state.engine.disconnect(session_id);
    info!(user_id = %user.id, "websocket closed");
}

async fn dispatch(
    state: &AppState,
    session_id: SessionId,
    user: &UserRow,
    command: ClientCommand,
) -> Result<(), ChatError> {
    match command {
        ClientCommand::Join { club_id } => {
            state.engine.join_room(session_id, &club_id).await?;
        }
        ClientCommand::Leave { club_id } => {
            state.engine.leave_room(session_id, &club_id);
        }
        ClientCommand::Send { club_id, text } => {
            state.engine.send_message(&club_id, &user.id, &text).await?;
        }
        ClientCommand::Edit { message_id, text } => {
            state
                .engine
                .edit_message(&message_id, &user.id, &text)
                .await?;
        }
        ClientCommand::Delete { message_id } => {
            let actor_is_admin = users::is_admin(&state.db, &user.id).await?;
            state
                .engine
                .delete_message(&message_id, &user.id, actor_is_admin)
                .await?;
        }
    }
    Ok(())
}

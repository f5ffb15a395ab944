use async_trait::async_trait;
use axum::{
    extract::{Path, Query, State, WebSocketUpgrade},
    response::Response,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::game::MatchService;
use crate::shared::{AppError, AppState};

use super::messages::{ChatPayload, MessageType, MovePayload, WebSocketMessage};
use super::socket::{Connection, MessageHandler, SocketWrapper};

/// Executes client commands through the match service
pub struct WebsocketReceiveHandler {
    match_service: Arc<MatchService>,
}

impl WebsocketReceiveHandler {
    pub fn new(match_service: Arc<MatchService>) -> Self {
        Self { match_service }
    }

    async fn dispatch(
        &self,
        player_id: &str,
        match_id: &str,
        message: WebSocketMessage,
    ) -> Result<(), AppError> {
        match message.message_type {
            MessageType::Move => {
                let payload: MovePayload = serde_json::from_value(message.payload)
                    .map_err(|e| AppError::BadRequest(format!("Invalid move payload: {}", e)))?;
                self.match_service
                    .play_move(match_id, payload.index, player_id)
                    .await?;
            }
            MessageType::Chat => {
                let payload: ChatPayload = serde_json::from_value(message.payload)
                    .map_err(|e| AppError::BadRequest(format!("Invalid chat payload: {}", e)))?;
                self.match_service
                    .post_chat(match_id, player_id, &payload.text)
                    .await?;
            }
            MessageType::Restart => {
                self.match_service.restart_match(match_id, player_id).await?;
            }
            other => {
                debug!(message_type = ?other, "Unhandled message type");
                return Err(AppError::BadRequest(format!(
                    "Unsupported message type: {:?}",
                    other
                )));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl MessageHandler for WebsocketReceiveHandler {
    async fn handle_message(
        &self,
        player_id: &str,
        match_id: &str,
        message: String,
    ) -> Option<WebSocketMessage> {
        debug!(
            player_id = %player_id,
            match_id = %match_id,
            message = %message,
            "Received message"
        );

        let result = match serde_json::from_str::<WebSocketMessage>(&message) {
            Ok(ws_message) => self.dispatch(player_id, match_id, ws_message).await,
            Err(e) => Err(AppError::BadRequest(format!("Malformed message: {}", e))),
        };

        // Successful commands are answered by the state broadcast
        match result {
            Ok(()) => None,
            Err(e) => {
                warn!(
                    player_id = %player_id,
                    match_id = %match_id,
                    error = %e,
                    "Rejected WebSocket command"
                );
                Some(WebSocketMessage::error(e.to_string()))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct WebsocketParams {
    pub player_id: String,
}

/// WebSocket endpoint for one match
/// GET /ws/:id?player_id=...
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    Path(match_id): Path<String>,
    Query(params): Query<WebsocketParams>,
    State(app_state): State<AppState>,
) -> Result<Response, AppError> {
    info!(
        match_id = %match_id,
        player_id = %params.player_id,
        "WebSocket connection requested"
    );

    // Reject unknown matches before upgrading
    app_state.match_service.get_match(&match_id).await?;

    Ok(ws.on_upgrade(move |socket| {
        handle_websocket_connection(socket, match_id, params.player_id, app_state)
    }))
}

/// Drive an upgraded socket until it disconnects
pub async fn handle_websocket_connection<S>(
    mut socket: S,
    match_id: String,
    player_id: String,
    app_state: AppState,
) where
    S: SocketWrapper + 'static,
{
    info!(
        match_id = %match_id,
        player_id = %player_id,
        "WebSocket connection established"
    );

    // Subscribe before reading the state so no update falls in between
    let events = app_state.event_bus.subscribe_to_match(&match_id).await;

    let game = match app_state.match_service.get_match(&match_id).await {
        Ok(game) => game,
        Err(e) => {
            warn!(match_id = %match_id, error = %e, "Match vanished before connection started");
            let _ = socket.close().await;
            return;
        }
    };

    let initial = match serde_json::to_string(&WebSocketMessage::state(&game)) {
        Ok(text) => text,
        Err(e) => {
            warn!(match_id = %match_id, error = %e, "Failed to serialize initial state");
            return;
        }
    };
    if let Err(e) = socket.send_message(initial).await {
        warn!(match_id = %match_id, error = ?e, "Failed to send initial state");
        return;
    }
    debug!(
        match_id = %match_id,
        player_id = %player_id,
        "Sent initial STATE to newly connected player"
    );

    let message_handler = Arc::new(WebsocketReceiveHandler::new(Arc::clone(
        &app_state.match_service,
    )));

    let connection = Connection::new(
        player_id.clone(),
        match_id.clone(),
        Box::new(socket),
        events,
        message_handler,
    );

    match connection.run().await {
        Ok(()) => {
            info!(
                match_id = %match_id,
                player_id = %player_id,
                "WebSocket connection closed cleanly"
            );
        }
        Err(e) => {
            warn!(
                match_id = %match_id,
                player_id = %player_id,
                error = ?e,
                "WebSocket connection error"
            );
        }
    }
}

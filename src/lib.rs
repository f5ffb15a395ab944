// Library crate for the tic-tac-toe match server
// This file exposes the public API for integration tests

pub mod bot;
pub mod config;
pub mod event;
pub mod game;
pub mod shared;
pub mod websockets;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

// Re-export commonly used types for easier access in tests
pub use bot::{BotMatchSubscriber, MinimaxStrategy};
pub use config::ServerConfig;
pub use event::{EventBus, MatchEvent, MatchSubscription};
pub use game::{GameMode, InMemoryMatchRepository, Match, MatchRepository, MatchService};
pub use shared::{AppError, AppState};
pub use websockets::{MessageType, WebSocketMessage, WebsocketReceiveHandler};

/// Builds the HTTP and WebSocket router over the given state
pub fn app(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(game::handlers::health))
        .route("/api/create-game", post(game::handlers::create_game))
        .route("/api/game/:id", get(game::handlers::get_game))
        .route("/api/lobby", get(game::handlers::list_lobby))
        .route("/api/join-game", post(game::handlers::join_game))
        .route("/api/move", post(game::handlers::make_move))
        .route("/api/restart", post(game::handlers::restart_game))
        .route("/api/chat", post(game::handlers::post_chat))
        .route("/ws/:id", get(websockets::websocket_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

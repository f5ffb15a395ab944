use axum::{
    extract::{Path, State},
    Json,
};
use tracing::{info, instrument};

use super::{
    logic::{ChatMessage, GameMode, Match},
    types::{
        ChatRequest, CreateGameRequest, CreateGameResponse, HealthResponse, JoinGameRequest,
        LobbyEntry, MoveRequest, RestartRequest,
    },
};
use crate::shared::{AppError, AppState};

/// HTTP handler for creating a new match
///
/// POST /api/create-game
#[instrument(name = "create_game", skip(state))]
pub async fn create_game(
    State(state): State<AppState>,
    Json(request): Json<CreateGameRequest>,
) -> Result<Json<CreateGameResponse>, AppError> {
    let mode = request.mode.unwrap_or(GameMode::Pvp);
    let game_id = state.match_service.create_match(mode).await?;

    info!(game_id = %game_id, mode = %mode, "Game created");
    Ok(Json(CreateGameResponse { game_id }))
}

/// GET /api/game/:id
#[instrument(name = "get_game", skip(state))]
pub async fn get_game(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<Match>, AppError> {
    let game = state.match_service.get_match(&game_id).await?;
    Ok(Json(game))
}

/// HTTP handler for the lobby
///
/// GET /api/lobby
/// Returns waiting player-vs-player matches, oldest first
#[instrument(name = "list_lobby", skip(state))]
pub async fn list_lobby(
    State(state): State<AppState>,
) -> Result<Json<Vec<LobbyEntry>>, AppError> {
    let open = state.match_service.list_open_matches().await?;
    info!(open_count = open.len(), "Lobby listed");
    Ok(Json(open))
}

/// POST /api/join-game
#[instrument(name = "join_game", skip(state))]
pub async fn join_game(
    State(state): State<AppState>,
    Json(request): Json<JoinGameRequest>,
) -> Result<Json<Match>, AppError> {
    let nickname = request.nickname.as_deref().unwrap_or_default();
    let game = state
        .match_service
        .join_match(&request.game_id, &request.player_id, nickname)
        .await?;
    Ok(Json(game))
}

/// POST /api/move
#[instrument(name = "make_move", skip(state))]
pub async fn make_move(
    State(state): State<AppState>,
    Json(request): Json<MoveRequest>,
) -> Result<Json<Match>, AppError> {
    let game = state
        .match_service
        .play_move(&request.game_id, request.index, &request.player_id)
        .await?;
    Ok(Json(game))
}

/// POST /api/restart
#[instrument(name = "restart_game", skip(state))]
pub async fn restart_game(
    State(state): State<AppState>,
    Json(request): Json<RestartRequest>,
) -> Result<Json<Match>, AppError> {
    let game = state
        .match_service
        .restart_match(&request.game_id, &request.player_id)
        .await?;
    Ok(Json(game))
}

/// POST /api/chat
#[instrument(name = "post_chat", skip(state, request))]
pub async fn post_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatMessage>, AppError> {
    let message = state
        .match_service
        .post_chat(&request.game_id, &request.player_id, &request.text)
        .await?;
    Ok(Json(message))
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    let games = state.match_service.match_count().await?;
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        games,
    }))
}

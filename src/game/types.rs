use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::logic::GameMode;

/// Request payload for creating a match; mode defaults to pvp
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CreateGameRequest {
    #[serde(default)]
    pub mode: Option<GameMode>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameResponse {
    pub game_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinGameRequest {
    pub game_id: String,
    pub player_id: String,
    #[serde(default)]
    pub nickname: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    pub game_id: String,
    pub index: usize,
    pub player_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestartRequest {
    pub game_id: String,
    pub player_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub game_id: String,
    pub player_id: String,
    pub text: String,
}

/// One open match as shown in the lobby
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbyEntry {
    pub id: String,
    pub players: usize,
    pub mode: GameMode,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub games: usize,
}

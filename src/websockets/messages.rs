use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::event::MatchEvent;
use crate::game::{ChatMessage, Match};

/// Message types for WebSocket communication
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageType {
    // Client -> Server
    Move,
    Restart,

    // Both directions
    Chat,

    // Server -> Client
    State,
    Error,
}

/// Metadata for WebSocket messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketMessageMeta {
    pub timestamp: DateTime<Utc>,
}

/// Base structure for WebSocket messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketMessage {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    #[serde(default)]
    pub payload: serde_json::Value,
    #[serde(default)]
    pub meta: Option<WebSocketMessageMeta>,
}

/// Client-to-Server message payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovePayload {
    pub index: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatPayload {
    pub text: String,
}

impl WebSocketMessage {
    pub fn new(message_type: MessageType, payload: serde_json::Value) -> Self {
        Self {
            message_type,
            payload,
            meta: Some(WebSocketMessageMeta {
                timestamp: Utc::now(),
            }),
        }
    }

    /// Create a STATE message carrying the full match
    pub fn state(game: &Match) -> Self {
        Self::new(MessageType::State, json!({ "game": game }))
    }

    /// Create a CHAT message carrying one chat entry
    pub fn chat(message: &ChatMessage) -> Self {
        Self::new(MessageType::Chat, json!({ "message": message }))
    }

    /// Create an ERROR message
    pub fn error(message: String) -> Self {
        Self::new(MessageType::Error, json!({ "message": message }))
    }

    /// Translate a bus event into the message pushed to clients
    pub fn from_event(event: &MatchEvent) -> Self {
        match event {
            MatchEvent::StateUpdated { game } => Self::state(game),
            MatchEvent::ChatPosted { message } => Self::chat(message),
        }
    }
}

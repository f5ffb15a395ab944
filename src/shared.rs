use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::bot::BotError;
use crate::event::EventBus;
use crate::game::{MatchError, MatchService};

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub match_service: Arc<MatchService>,
    pub event_bus: EventBus,
}

impl AppState {
    pub fn new(match_service: Arc<MatchService>, event_bus: EventBus) -> Self {
        Self {
            match_service,
            event_bus,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Match(#[from] MatchError),

    #[error("Bot error: {0}")]
    Bot(#[from] BotError),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Match(e) => match e {
                MatchError::MatchFull | MatchError::NotFinished => StatusCode::CONFLICT,
                MatchError::NotAParticipant => StatusCode::FORBIDDEN,
                MatchError::IllegalMove(_) | MatchError::EmptyMessage => StatusCode::BAD_REQUEST,
            },
            AppError::Bot(_) | AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

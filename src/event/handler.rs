use async_trait::async_trait;
use thiserror::Error;

use super::events::MatchEvent;

/// Errors that can occur when handling match events
#[derive(Debug, Error)]
pub enum MatchEventError {
    #[error("Match not found: {0}")]
    MatchNotFound(String),

    #[error("Handler error: {0}")]
    HandlerError(String),
}

/// Trait for components that react to events on a single match
#[async_trait]
pub trait MatchEventHandler: Send + Sync {
    async fn handle_match_event(
        &self,
        match_id: &str,
        event: MatchEvent,
    ) -> Result<(), MatchEventError>;

    /// Get a human-readable name for this handler (for logging/debugging)
    fn handler_name(&self) -> &'static str;
}

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    event::{MatchEvent, MatchEventError, MatchEventHandler},
    game::MatchService,
    shared::AppError,
};

use super::types::is_bot_turn;

/// Plays the bot's reply whenever a state update hands it the turn
pub struct BotMatchSubscriber {
    match_service: Arc<MatchService>,
}

impl BotMatchSubscriber {
    pub fn new(match_service: Arc<MatchService>) -> Self {
        Self { match_service }
    }

    async fn handle_state_updated(&self, match_id: &str) -> Result<(), MatchEventError> {
        match self.match_service.play_bot_move_after_delay(match_id).await {
            Ok(Some(cell)) => {
                info!(match_id = %match_id, cell = cell, "Bot replied");
                Ok(())
            }
            // The turn moved on while the bot was waiting
            Ok(None) => Ok(()),
            Err(AppError::NotFound(_)) => Err(MatchEventError::MatchNotFound(match_id.to_string())),
            Err(e) => Err(MatchEventError::HandlerError(e.to_string())),
        }
    }
}

#[async_trait]
impl MatchEventHandler for BotMatchSubscriber {
    async fn handle_match_event(
        &self,
        match_id: &str,
        event: MatchEvent,
    ) -> Result<(), MatchEventError> {
        match event {
            MatchEvent::StateUpdated { game } if is_bot_turn(&game) => {
                debug!(match_id = %match_id, "Bot's turn detected");
                self.handle_state_updated(match_id).await
            }
            _ => Ok(()),
        }
    }

    fn handler_name(&self) -> &'static str {
        "BotMatchSubscriber"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        bot::BOT_PLAYER_ID,
        event::EventBus,
        game::{GameMode, InMemoryMatchRepository, Match, Symbol},
    };
    use std::time::Duration;

    fn service() -> Arc<MatchService> {
        Arc::new(MatchService::new(
            Arc::new(InMemoryMatchRepository::new()),
            EventBus::default(),
            Duration::ZERO,
        ))
    }

    #[tokio::test]
    async fn test_bot_replies_on_its_turn() {
        let service = service();
        let id = service.create_match(GameMode::Bot).await.unwrap();
        service.join_match(&id, "human", "Alice").await.unwrap();
        let game = service.play_move(&id, 0, "human").await.unwrap();

        let subscriber = BotMatchSubscriber::new(Arc::clone(&service));
        // Races the subscription started by create_match; whichever loses sees a human turn
        subscriber
            .handle_match_event(&id, MatchEvent::state(&game))
            .await
            .unwrap();

        let stored = service.get_match(&id).await.unwrap();
        assert_eq!(stored.board().marks(), 2);
        assert_eq!(stored.current_player(), Symbol::X);
        assert_eq!(stored.board().get(4), Some(Some(Symbol::O)));
    }

    #[tokio::test]
    async fn test_ignores_human_turn_and_chat() {
        let service = service();
        let subscriber = BotMatchSubscriber::new(Arc::clone(&service));

        let mut game = Match::new(GameMode::Pvp);
        game.admit("p1", "Alice").unwrap();
        game.admit("p2", "Bob").unwrap();

        // No match is stored, so acting on either event would surface an error
        subscriber
            .handle_match_event("missing", MatchEvent::state(&game))
            .await
            .unwrap();

        let message = game.post_chat("p1", "hello").unwrap();
        subscriber
            .handle_match_event("missing", MatchEvent::ChatPosted { message })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_missing_match_reports_not_found() {
        let service = service();
        let subscriber = BotMatchSubscriber::new(Arc::clone(&service));

        let mut game = Match::new(GameMode::Bot);
        game.admit("human", "Alice").unwrap();
        game.admit_as(BOT_PLAYER_ID, "Bot", crate::game::Controller::Bot)
            .unwrap();
        game.apply_move(0, "human").unwrap();

        let result = subscriber
            .handle_match_event("missing", MatchEvent::state(&game))
            .await;
        assert!(matches!(result, Err(MatchEventError::MatchNotFound(_))));
    }
}

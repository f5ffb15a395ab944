use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OwnedMutexGuard;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::{
    locks::MatchLocks,
    logic::{ChatMessage, Controller, GameMode, Match, MatchStatus},
    repository::MatchRepository,
    types::LobbyEntry,
};
use crate::{
    bot::{
        is_bot_turn, BotMatchSubscriber, BotStrategy, MinimaxStrategy, BOT_DISPLAY_NAME,
        BOT_PLAYER_ID,
    },
    event::{EventBus, MatchEvent, MatchSubscription},
    shared::AppError,
};

/// Orchestrates match operations: load from the repository under the match's lock,
/// apply one state-machine operation, store, then publish on the event bus
pub struct MatchService {
    repository: Arc<dyn MatchRepository + Send + Sync>,
    event_bus: EventBus,
    locks: MatchLocks,
    strategy: Arc<dyn BotStrategy>,
    bot_move_delay: Duration,
}

impl MatchService {
    pub fn new(
        repository: Arc<dyn MatchRepository + Send + Sync>,
        event_bus: EventBus,
        bot_move_delay: Duration,
    ) -> Self {
        Self {
            repository,
            event_bus,
            locks: MatchLocks::new(),
            strategy: Arc::new(MinimaxStrategy::new()),
            bot_move_delay,
        }
    }

    /// Creates a match and, in bot mode, starts the bot's subscription to it
    #[instrument(skip(self))]
    pub async fn create_match(self: &Arc<Self>, mode: GameMode) -> Result<String, AppError> {
        let match_id = Uuid::new_v4().to_string();
        self.locks.register(&match_id).await;
        self.repository.set_match(&match_id, Match::new(mode)).await?;

        if mode == GameMode::Bot {
            let subscriber = BotMatchSubscriber::new(Arc::clone(self));
            MatchSubscription::new(
                match_id.clone(),
                Arc::new(subscriber),
                self.event_bus.clone(),
            )
            .start()
            .await;
        }

        info!(match_id = %match_id, mode = %mode, "Match created");
        Ok(match_id)
    }

    #[instrument(skip(self))]
    pub async fn get_match(&self, match_id: &str) -> Result<Match, AppError> {
        self.repository
            .get_match(match_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Game not found: {}", match_id)))
    }

    /// Waiting player-vs-player matches, oldest first
    #[instrument(skip(self))]
    pub async fn list_open_matches(&self) -> Result<Vec<LobbyEntry>, AppError> {
        let mut open: Vec<LobbyEntry> = self
            .repository
            .list_matches()
            .await?
            .into_iter()
            .filter(|(_, game)| {
                game.status() == MatchStatus::Waiting && game.mode() == GameMode::Pvp
            })
            .map(|(id, game)| LobbyEntry {
                id,
                players: game.players().len(),
                mode: game.mode(),
                created_at: game.created_at(),
            })
            .collect();

        open.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        debug!(open_count = open.len(), "Listed open matches");
        Ok(open)
    }

    pub async fn match_count(&self) -> Result<usize, AppError> {
        Ok(self.repository.list_matches().await?.len())
    }

    /// Admits a human; in bot mode the bot takes the second seat right after the
    /// first human
    #[instrument(skip(self))]
    pub async fn join_match(
        &self,
        match_id: &str,
        player_id: &str,
        nickname: &str,
    ) -> Result<Match, AppError> {
        Self::validate_player_id(player_id)?;

        let _guard = self.lock_match(match_id).await?;
        let mut game = self.get_match(match_id).await?;

        game.admit(player_id, nickname)?;

        if game.mode() == GameMode::Bot && game.players().len() == 1 {
            game.admit_as(BOT_PLAYER_ID, BOT_DISPLAY_NAME, Controller::Bot)?;
            info!(match_id = %match_id, "Bot admitted as second player");
        }

        self.store_and_publish(match_id, &game).await?;

        info!(
            match_id = %match_id,
            player_id = %player_id,
            player_count = game.players().len(),
            status = ?game.status(),
            "Player joined match"
        );
        Ok(game)
    }

    #[instrument(skip(self))]
    pub async fn play_move(
        &self,
        match_id: &str,
        index: usize,
        player_id: &str,
    ) -> Result<Match, AppError> {
        Self::validate_player_id(player_id)?;

        let _guard = self.lock_match(match_id).await?;
        let mut game = self.get_match(match_id).await?;

        if let Err(e) = game.apply_move(index, player_id) {
            warn!(match_id = %match_id, player_id = %player_id, index = index, error = %e, "Move rejected");
            return Err(e.into());
        }

        self.store_and_publish(match_id, &game).await?;

        info!(
            match_id = %match_id,
            player_id = %player_id,
            index = index,
            winner = ?game.winner(),
            "Move played"
        );
        Ok(game)
    }

    /// Plays the bot's move if it is the bot's turn; `None` when there was
    /// nothing to do (the state moved on, or no bot is seated)
    #[instrument(skip(self))]
    pub async fn play_bot_move(&self, match_id: &str) -> Result<Option<usize>, AppError> {
        let _guard = self.lock_match(match_id).await?;
        let mut game = self.get_match(match_id).await?;

        if !is_bot_turn(&game) {
            debug!(match_id = %match_id, "Not the bot's turn, skipping");
            return Ok(None);
        }

        let cell = self.strategy.decide_move(&game)?;
        let bot_id = game
            .bot_player()
            .map(|bot| bot.id.clone())
            .ok_or(AppError::Internal)?;
        game.apply_move(cell, &bot_id)?;

        self.store_and_publish(match_id, &game).await?;

        info!(
            match_id = %match_id,
            strategy = self.strategy.strategy_name(),
            cell = cell,
            winner = ?game.winner(),
            "Bot played move"
        );
        Ok(Some(cell))
    }

    /// Waits the configured pacing delay plus jitter, then plays the bot's move
    pub async fn play_bot_move_after_delay(
        &self,
        match_id: &str,
    ) -> Result<Option<usize>, AppError> {
        let base = self.bot_move_delay.as_millis() as u64;
        let jitter = rand::rng().random_range(0..=base / 2);
        tokio::time::sleep(Duration::from_millis(base + jitter)).await;
        self.play_bot_move(match_id).await
    }

    /// Restarts a finished match; only its players may ask
    #[instrument(skip(self))]
    pub async fn restart_match(&self, match_id: &str, player_id: &str) -> Result<Match, AppError> {
        let _guard = self.lock_match(match_id).await?;
        let mut game = self.get_match(match_id).await?;

        if !game.is_participant(player_id) {
            return Err(crate::game::MatchError::NotAParticipant.into());
        }
        game.restart()?;

        self.store_and_publish(match_id, &game).await?;

        info!(match_id = %match_id, player_id = %player_id, "Match restarted");
        Ok(game)
    }

    #[instrument(skip(self, text))]
    pub async fn post_chat(
        &self,
        match_id: &str,
        player_id: &str,
        text: &str,
    ) -> Result<ChatMessage, AppError> {
        let _guard = self.lock_match(match_id).await?;
        let mut game = self.get_match(match_id).await?;

        let message = game.post_chat(player_id, text)?;
        self.repository.set_match(match_id, game).await?;

        self.event_bus
            .emit_to_match(
                match_id,
                MatchEvent::ChatPosted {
                    message: message.clone(),
                },
            )
            .await;

        debug!(match_id = %match_id, player_id = %player_id, "Chat message posted");
        Ok(message)
    }

    /// Locks a created match; unknown ids are `NotFound` and leave no lock behind
    async fn lock_match(&self, match_id: &str) -> Result<OwnedMutexGuard<()>, AppError> {
        self.locks
            .acquire(match_id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("Game not found: {}", match_id)))
    }

    async fn store_and_publish(&self, match_id: &str, game: &Match) -> Result<(), AppError> {
        self.repository.set_match(match_id, game.clone()).await?;
        self.event_bus
            .emit_to_match(match_id, MatchEvent::state(game))
            .await;
        Ok(())
    }

    /// Rejects blank ids and the id reserved for the bot
    fn validate_player_id(player_id: &str) -> Result<(), AppError> {
        if player_id.trim().is_empty() {
            return Err(AppError::BadRequest("playerId is required".to_string()));
        }
        if player_id == BOT_PLAYER_ID {
            return Err(AppError::BadRequest(format!(
                "playerId '{}' is reserved",
                BOT_PLAYER_ID
            )));
        }
        Ok(())
    }
}

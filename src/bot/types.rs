use crate::game::Match;

/// Reserved player id for the computer opponent
pub const BOT_PLAYER_ID: &str = "bot";

/// Display label for the computer opponent
pub const BOT_DISPLAY_NAME: &str = "Bot";

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BotError {
    #[error("no bot player in match")]
    NoBotPlayer,
    #[error("no legal move")]
    NoLegalMove,
}

/// Trait for bot decision-making strategies
pub trait BotStrategy: Send + Sync {
    /// Decide which cell the bot plays in the given match
    fn decide_move(&self, game: &Match) -> Result<usize, BotError>;

    /// Get the name of this strategy
    fn strategy_name(&self) -> &'static str;
}

/// Check whether the bot is to move: a bot-controlled player exists,
/// the match is in progress and its symbol is next
pub fn is_bot_turn(game: &Match) -> bool {
    match game.bot_player() {
        Some(bot) => {
            game.status() == crate::game::MatchStatus::Playing
                && bot.symbol == game.current_player()
        }
        None => false,
    }
}

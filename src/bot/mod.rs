pub mod minimax;
pub mod subscriber;
pub mod types;

pub use minimax::{best_move, compute_bot_move, MinimaxStrategy};
pub use subscriber::BotMatchSubscriber;
pub use types::{is_bot_turn, BotError, BotStrategy, BOT_DISPLAY_NAME, BOT_PLAYER_ID};

// Public API
pub use board::{evaluate, Board, Cell, Outcome, Symbol, CELL_COUNT, CENTER, WINNING_LINES};
pub use logic::{
    ChatLog, ChatMessage, Controller, GameMode, IllegalMoveReason, Match, MatchError,
    MatchStatus, Player, CHAT_CAPACITY, DEFAULT_DISPLAY_NAME, MAX_PLAYERS,
};
pub use repository::{InMemoryMatchRepository, MatchRepository};
pub use service::MatchService;

// Internal modules
mod board;
mod locks;
mod logic;
mod repository;
mod service;

pub mod handlers;
pub mod types;

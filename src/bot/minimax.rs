use tracing::debug;

use crate::game::{Board, Match, Outcome, Symbol, CELL_COUNT, CENTER};

use super::types::{BotError, BotStrategy};

const WIN_SCORE: i32 = 10;
const LOSS_SCORE: i32 = -10;
const DRAW_SCORE: i32 = 0;

/// Exhaustive minimax over the whole board.
///
/// Leaves score +10/-10/0 with no depth discount, so a slow win is worth the same as a
/// fast one. Ties between cells go to the lowest index.
pub struct MinimaxStrategy;

impl MinimaxStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MinimaxStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl BotStrategy for MinimaxStrategy {
    fn decide_move(&self, game: &Match) -> Result<usize, BotError> {
        compute_bot_move(game)
    }

    fn strategy_name(&self) -> &'static str {
        "MinimaxStrategy"
    }
}

/// Optimal cell for the match's bot-controlled player
pub fn compute_bot_move(game: &Match) -> Result<usize, BotError> {
    let bot = game.bot_player().ok_or(BotError::NoBotPlayer)?;
    let cell = best_move(game.board(), bot.symbol).ok_or(BotError::NoLegalMove)?;

    debug!(
        bot_symbol = %bot.symbol,
        cell = cell,
        "Bot decided on move"
    );

    Ok(cell)
}

/// Optimal cell for `symbol` on `board`, `None` when the board is full
pub fn best_move(board: &Board, symbol: Symbol) -> Option<usize> {
    if board.is_empty() {
        return Some(CENTER);
    }

    let mut best_score = i32::MIN;
    let mut best_cell = None;

    for cell in board.empty_cells() {
        let score = minimax(&board.with_mark(cell, symbol), symbol, false, 1);
        if score > best_score {
            best_score = score;
            best_cell = Some(cell);
        }
    }

    best_cell.or_else(|| board.empty_cells().next())
}

fn minimax(board: &Board, bot: Symbol, maximizing: bool, depth: usize) -> i32 {
    debug_assert!(depth <= CELL_COUNT, "search deeper than the board");

    match board.evaluate() {
        Some(Outcome::Draw) => return DRAW_SCORE,
        Some(outcome) if outcome.winner() == Some(bot) => return WIN_SCORE,
        Some(_) => return LOSS_SCORE,
        None => {}
    }

    let mover = if maximizing { bot } else { bot.opponent() };
    let scores = board
        .empty_cells()
        .map(|cell| minimax(&board.with_mark(cell, mover), bot, !maximizing, depth + 1));

    if maximizing {
        scores.max().unwrap_or(DRAW_SCORE)
    } else {
        scores.min().unwrap_or(DRAW_SCORE)
    }
}

// A Match is one game session between up to two players on a single board.
//
// Every mutating operation validates all of its inputs before touching the match,
// so a rejected call leaves the value exactly as it was.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use strum_macros::{Display, EnumString};

use super::board::{Board, Outcome, Symbol, CELL_COUNT};

pub const MAX_PLAYERS: usize = 2;
pub const CHAT_CAPACITY: usize = 50;
pub const DEFAULT_DISPLAY_NAME: &str = "Anonymous";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GameMode {
    Pvp,
    Bot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Waiting,
    Playing,
    Finished,
}

/// Who submits moves for a player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Controller {
    #[default]
    Human,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    pub nickname: String,
    pub symbol: Symbol,
    pub joined_at: DateTime<Utc>,
    #[serde(default)]
    pub controlled_by: Controller,
}

impl Player {
    pub fn is_bot(&self) -> bool {
        self.controlled_by == Controller::Bot
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub player_id: String,
    pub nickname: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// Chat history bounded to [`CHAT_CAPACITY`] entries, oldest evicted first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ChatMessage>", into = "Vec<ChatMessage>")]
pub struct ChatLog(VecDeque<ChatMessage>);

impl ChatLog {
    pub fn push(&mut self, message: ChatMessage) {
        self.0.push_back(message);
        while self.0.len() > CHAT_CAPACITY {
            self.0.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChatMessage> {
        self.0.iter()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.0.back()
    }
}

impl From<Vec<ChatMessage>> for ChatLog {
    fn from(messages: Vec<ChatMessage>) -> Self {
        let mut log = ChatLog::default();
        for message in messages {
            log.push(message);
        }
        log
    }
}

impl From<ChatLog> for Vec<ChatMessage> {
    fn from(log: ChatLog) -> Self {
        log.0.into()
    }
}

/// Why a move was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IllegalMoveReason {
    #[error("match is not in progress")]
    NotPlaying,
    #[error("match already has an outcome")]
    AlreadyFinished,
    #[error("cell index out of range")]
    OutOfRange,
    #[error("cell already occupied")]
    CellOccupied,
    #[error("player is not in this match")]
    UnknownPlayer,
    #[error("not this player's turn")]
    NotYourTurn,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    #[error("Match is full")]
    MatchFull,
    #[error("Illegal move: {0}")]
    IllegalMove(IllegalMoveReason),
    #[error("Player is not a participant in this match")]
    NotAParticipant,
    #[error("Match is not finished")]
    NotFinished,
    #[error("Chat message is empty")]
    EmptyMessage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    board: Board,
    current_player: Symbol,
    winner: Option<Outcome>,
    players: Vec<Player>,
    status: MatchStatus,
    mode: GameMode,
    created_at: DateTime<Utc>,
    chat: ChatLog,
}

impl Match {
    pub fn new(mode: GameMode) -> Self {
        Self {
            board: Board::new(),
            current_player: Symbol::X,
            winner: None,
            players: Vec::new(),
            status: MatchStatus::Waiting,
            mode,
            created_at: Utc::now(),
            chat: ChatLog::default(),
        }
    }

    /// Admits a human player
    pub fn admit(&mut self, player_id: &str, nickname: &str) -> Result<(), MatchError> {
        self.admit_as(player_id, nickname, Controller::Human)
    }

    /// Admits a player with an explicit controller.
    ///
    /// Re-admitting a known id is a no-op, even once the match is full.
    pub fn admit_as(
        &mut self,
        player_id: &str,
        nickname: &str,
        controlled_by: Controller,
    ) -> Result<(), MatchError> {
        if self.player(player_id).is_some() {
            return Ok(());
        }

        if self.players.len() >= MAX_PLAYERS {
            return Err(MatchError::MatchFull);
        }

        let symbol = if self.players.is_empty() {
            Symbol::X
        } else {
            Symbol::O
        };

        let nickname = nickname.trim();
        let nickname = if nickname.is_empty() {
            DEFAULT_DISPLAY_NAME.to_string()
        } else {
            nickname.to_string()
        };

        self.players.push(Player {
            id: player_id.to_string(),
            nickname,
            symbol,
            joined_at: Utc::now(),
            controlled_by,
        });
        self.refresh_status();
        Ok(())
    }

    pub fn apply_move(&mut self, index: usize, player_id: &str) -> Result<(), MatchError> {
        use IllegalMoveReason::*;

        if self.status != MatchStatus::Playing {
            return Err(MatchError::IllegalMove(NotPlaying));
        }
        if self.winner.is_some() {
            return Err(MatchError::IllegalMove(AlreadyFinished));
        }
        if index >= CELL_COUNT {
            return Err(MatchError::IllegalMove(OutOfRange));
        }
        if self.board.get(index).flatten().is_some() {
            return Err(MatchError::IllegalMove(CellOccupied));
        }

        let player = self
            .player(player_id)
            .ok_or(MatchError::IllegalMove(UnknownPlayer))?;
        if player.symbol != self.current_player {
            return Err(MatchError::IllegalMove(NotYourTurn));
        }

        self.board = self.board.with_mark(index, self.current_player);
        self.current_player = self.current_player.opponent();
        self.winner = self.board.evaluate();
        self.refresh_status();
        Ok(())
    }

    /// Clears the board for a new game with the same players, mode and chat
    pub fn restart(&mut self) -> Result<(), MatchError> {
        if self.winner.is_none() {
            return Err(MatchError::NotFinished);
        }

        self.board = Board::new();
        self.current_player = Symbol::X;
        self.winner = None;
        self.refresh_status();
        Ok(())
    }

    pub fn post_chat(&mut self, player_id: &str, text: &str) -> Result<ChatMessage, MatchError> {
        let player = self.player(player_id).ok_or(MatchError::NotAParticipant)?;

        let text = text.trim();
        if text.is_empty() {
            return Err(MatchError::EmptyMessage);
        }

        let message = ChatMessage {
            player_id: player.id.clone(),
            nickname: player.nickname.clone(),
            text: text.to_string(),
            timestamp: Utc::now(),
        };
        self.chat.push(message.clone());
        Ok(message)
    }

    fn refresh_status(&mut self) {
        self.status = if self.winner.is_some() {
            MatchStatus::Finished
        } else if self.players.len() == MAX_PLAYERS {
            MatchStatus::Playing
        } else {
            MatchStatus::Waiting
        };
    }

    pub fn player(&self, player_id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    pub fn is_participant(&self, player_id: &str) -> bool {
        self.player(player_id).is_some()
    }

    pub fn bot_player(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.is_bot())
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Symbol {
        self.current_player
    }

    pub fn winner(&self) -> Option<Outcome> {
        self.winner
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn status(&self) -> MatchStatus {
        self.status
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn chat(&self) -> &ChatLog {
        &self.chat
    }
}

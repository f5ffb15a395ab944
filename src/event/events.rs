use serde::{Deserialize, Serialize};

use crate::game::{ChatMessage, Match};

/// Events published on a match's channel after a successful mutation
///
/// Events represent facts about things that have already happened; subscribers
/// (socket connections, the bot) react to them without calling back into the
/// publisher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MatchEvent {
    /// Full state after admission, a move or a restart
    StateUpdated { game: Box<Match> },

    /// A chat message was appended to the log
    ChatPosted { message: ChatMessage },
}

impl MatchEvent {
    pub fn state(game: &Match) -> Self {
        MatchEvent::StateUpdated {
            game: Box::new(game.clone()),
        }
    }

    /// Get a human-readable description of the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            MatchEvent::StateUpdated { .. } => "state_updated",
            MatchEvent::ChatPosted { .. } => "chat_posted",
        }
    }
}

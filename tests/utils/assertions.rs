use std::time::Duration;
use tokio::sync::broadcast;

use tictactoe::{EventBus, Match, MatchEvent};

// ============================================================================
// Event Recording
// ============================================================================

/// Records what a match channel publishes, as a socket connection would see it
pub struct EventRecorder {
    receiver: broadcast::Receiver<MatchEvent>,
}

impl EventRecorder {
    pub async fn attach(event_bus: &EventBus, match_id: &str) -> Self {
        Self {
            receiver: event_bus.subscribe_to_match(match_id).await,
        }
    }

    pub async fn next_event(&mut self) -> MatchEvent {
        tokio::time::timeout(Duration::from_secs(2), self.receiver.recv())
            .await
            .expect("event within timeout")
            .expect("channel open")
    }

    pub async fn next_state(&mut self) -> Match {
        match self.next_event().await {
            MatchEvent::StateUpdated { game } => *game,
            other => panic!("expected a state update, got {:?}", other),
        }
    }

    /// Skips state updates until one satisfies the predicate
    pub async fn wait_for_state<F>(&mut self, predicate: F) -> Match
    where
        F: Fn(&Match) -> bool,
    {
        loop {
            if let MatchEvent::StateUpdated { game } = self.next_event().await {
                if predicate(&game) {
                    return *game;
                }
            }
        }
    }

    /// Asserts nothing is published for a short while
    pub async fn expect_silence(&mut self) {
        let result = tokio::time::timeout(Duration::from_millis(50), self.receiver.recv()).await;
        assert!(result.is_err(), "unexpected event: {:?}", result);
    }
}

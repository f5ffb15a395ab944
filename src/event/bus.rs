use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::debug;

use super::events::MatchEvent;

pub const DEFAULT_CHANNEL_CAPACITY: usize = 100;

/// Event bus with one broadcast channel per match
#[derive(Debug, Clone)]
pub struct EventBus {
    /// Match-specific event channels: match_id -> sender
    match_channels: Arc<RwLock<HashMap<String, broadcast::Sender<MatchEvent>>>>,
    capacity: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

impl EventBus {
    /// Creates a new event bus; each match channel buffers `capacity` events
    pub fn new(capacity: usize) -> Self {
        Self {
            match_channels: Arc::new(RwLock::new(HashMap::new())),
            capacity: capacity.max(1),
        }
    }

    /// Emits an event to all subscribers of a specific match
    pub async fn emit_to_match(&self, match_id: &str, event: MatchEvent) {
        let sender = self.sender_for(match_id).await;
        let event_type = event.event_type();

        match sender.send(event) {
            Ok(receiver_count) => {
                debug!(
                    match_id = %match_id,
                    event_type = event_type,
                    receivers = receiver_count,
                    "Match event emitted"
                );
            }
            Err(_) => {
                debug!(
                    match_id = %match_id,
                    event_type = event_type,
                    "Match event emitted with no receivers"
                );
            }
        }
    }

    /// Subscribe to events for a specific match
    pub async fn subscribe_to_match(&self, match_id: &str) -> broadcast::Receiver<MatchEvent> {
        self.sender_for(match_id).await.subscribe()
    }

    async fn sender_for(&self, match_id: &str) -> broadcast::Sender<MatchEvent> {
        {
            let match_channels = self.match_channels.read().await;
            if let Some(sender) = match_channels.get(match_id) {
                return sender.clone();
            }
        }

        debug!(match_id = %match_id, "Creating new match channel");
        let mut match_channels = self.match_channels.write().await;
        match_channels
            .entry(match_id.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .clone()
    }
}

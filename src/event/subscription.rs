use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{bus::EventBus, handler::MatchEventHandler};

/// Routes every event of one match to a handler on a background task
pub struct MatchSubscription {
    match_id: String,
    handler: Arc<dyn MatchEventHandler>,
    event_bus: EventBus,
}

impl MatchSubscription {
    pub fn new(match_id: String, handler: Arc<dyn MatchEventHandler>, event_bus: EventBus) -> Self {
        Self {
            match_id,
            handler,
            event_bus,
        }
    }

    /// Subscribes before returning, so events emitted after `start` resolves are
    /// never missed
    pub async fn start(self) -> JoinHandle<()> {
        let match_id = self.match_id.clone();
        let handler_name = self.handler.handler_name();

        info!(
            match_id = %match_id,
            handler = handler_name,
            "Starting match subscription"
        );

        let mut receiver = self.event_bus.subscribe_to_match(&match_id).await;

        tokio::spawn(async move {
            loop {
                let event = match receiver.recv().await {
                    Ok(event) => event,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(
                            match_id = %match_id,
                            handler = handler_name,
                            skipped = skipped,
                            "Match subscription lagged, events dropped"
                        );
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                };

                debug!(
                    match_id = %match_id,
                    handler = handler_name,
                    event_type = event.event_type(),
                    "Received match event"
                );

                if let Err(e) = self.handler.handle_match_event(&match_id, event).await {
                    warn!(
                        match_id = %match_id,
                        handler = handler_name,
                        error = %e,
                        "Match event handler failed"
                    );
                }
            }

            info!(
                match_id = %match_id,
                handler = handler_name,
                "Match subscription ended - no more events"
            );
        })
    }
}

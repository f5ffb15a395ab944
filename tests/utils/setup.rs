use axum::Router;
use std::sync::Arc;
use std::time::Duration;

use tictactoe::{app, AppState, EventBus, InMemoryMatchRepository, MatchService};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub app: Router,
    pub event_bus: EventBus,
    pub match_service: Arc<MatchService>,
}

pub struct TestSetupBuilder {
    bot_move_delay: Duration,
    channel_capacity: usize,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            bot_move_delay: Duration::ZERO,
            channel_capacity: 100,
        }
    }

    pub fn with_bot_move_delay(mut self, delay: Duration) -> Self {
        self.bot_move_delay = delay;
        self
    }

    pub fn build(self) -> TestSetup {
        let event_bus = EventBus::new(self.channel_capacity);
        let match_service = Arc::new(MatchService::new(
            Arc::new(InMemoryMatchRepository::new()),
            event_bus.clone(),
            self.bot_move_delay,
        ));
        let app = app(AppState::new(Arc::clone(&match_service), event_bus.clone()));

        TestSetup {
            app,
            event_bus,
            match_service,
        }
    }
}

use std::sync::Arc;
use tictactoe::{app, AppState, EventBus, InMemoryMatchRepository, MatchService, ServerConfig};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tictactoe=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;
    info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        bot_move_delay_ms = config.bot_move_delay.as_millis() as u64,
        event_channel_capacity = config.event_channel_capacity,
        "Starting tic-tac-toe server"
    );

    // Matches live in memory for the lifetime of the process
    let match_repository = Arc::new(InMemoryMatchRepository::new());
    let event_bus = EventBus::new(config.event_channel_capacity);
    let match_service = Arc::new(MatchService::new(
        match_repository,
        event_bus.clone(),
        config.bot_move_delay,
    ));
    let app_state = AppState::new(match_service, event_bus);

    let listener = tokio::net::TcpListener::bind(config.socket_addr()).await?;
    info!("Server running on http://{}", config.socket_addr());
    axum::serve(listener, app(app_state)).await?;

    Ok(())
}

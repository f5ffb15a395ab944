use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::event::DEFAULT_CHANNEL_CAPACITY;

pub const DEFAULT_PORT: u16 = 4000;
pub const DEFAULT_BIND_ADDR: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
pub const DEFAULT_BOT_MOVE_DELAY_MS: u64 = 500;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("{key} must be greater than zero")]
    MustBePositive { key: &'static str },
}

/// Server settings read from the environment at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: IpAddr,
    pub port: u16,
    pub bot_move_delay: Duration,
    pub event_channel_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR,
            port: DEFAULT_PORT,
            bot_move_delay: Duration::from_millis(DEFAULT_BOT_MOVE_DELAY_MS),
            event_channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl ServerConfig {
    /// Reads PORT, BIND_ADDR, BOT_MOVE_DELAY_MS and EVENT_CHANNEL_CAPACITY
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset keys fall back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = parse_or(&lookup, "BIND_ADDR", || DEFAULT_BIND_ADDR)?;
        let port = parse_or(&lookup, "PORT", || DEFAULT_PORT)?;
        let delay_ms = parse_or(&lookup, "BOT_MOVE_DELAY_MS", || DEFAULT_BOT_MOVE_DELAY_MS)?;
        let event_channel_capacity =
            parse_or(&lookup, "EVENT_CHANNEL_CAPACITY", || DEFAULT_CHANNEL_CAPACITY)?;

        // broadcast::channel panics on zero capacity
        if event_channel_capacity == 0 {
            return Err(ConfigError::MustBePositive {
                key: "EVENT_CHANNEL_CAPACITY",
            });
        }

        Ok(Self {
            bind_addr,
            port,
            bot_move_delay: Duration::from_millis(delay_ms),
            event_channel_capacity,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: impl FnOnce() -> T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue { key, value })
        }
        _ => Ok(default()),
    }
}

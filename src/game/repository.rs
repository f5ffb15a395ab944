use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use super::logic::Match;
use crate::shared::AppError;

/// Key-value store of matches by id
///
/// Implementations only store and fetch; read-modify-write cycles are serialized
/// per match by the caller.
#[async_trait]
pub trait MatchRepository {
    async fn get_match(&self, match_id: &str) -> Result<Option<Match>, AppError>;
    async fn set_match(&self, match_id: &str, game: Match) -> Result<(), AppError>;
    async fn list_matches(&self) -> Result<Vec<(String, Match)>, AppError>;
}

/// In-memory implementation of MatchRepository, lives for the process lifetime
pub struct InMemoryMatchRepository {
    matches: Arc<RwLock<HashMap<String, Match>>>,
}

impl Default for InMemoryMatchRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryMatchRepository {
    pub fn new() -> Self {
        Self {
            matches: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl MatchRepository for InMemoryMatchRepository {
    #[instrument(skip(self))]
    async fn get_match(&self, match_id: &str) -> Result<Option<Match>, AppError> {
        let matches = self.matches.read().await;
        let game = matches.get(match_id).cloned();

        if game.is_none() {
            debug!(match_id = %match_id, "Match not found in memory");
        }

        Ok(game)
    }

    #[instrument(skip(self, game))]
    async fn set_match(&self, match_id: &str, game: Match) -> Result<(), AppError> {
        debug!(match_id = %match_id, status = ?game.status(), "Storing match in memory");

        let mut matches = self.matches.write().await;
        matches.insert(match_id.to_string(), game);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_matches(&self) -> Result<Vec<(String, Match)>, AppError> {
        let matches = self.matches.read().await;
        let list: Vec<(String, Match)> = matches
            .iter()
            .map(|(id, game)| (id.clone(), game.clone()))
            .collect();

        debug!(match_count = list.len(), "Listed matches in memory");
        Ok(list)
    }
}

use std::sync::Arc;

use quiz_core::model::LeaderboardEntry;
use storage::repository::{HistoryRepository, LeaderboardRepository, StorageError};

/// Rows shown on the leaderboard screen.
pub const LEADERBOARD_LIMIT: usize = 5;

/// One user's score log for one category, oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryHistory {
    pub category: String,
    pub scores: Vec<u32>,
}

/// Read-only views over the leaderboard and the score history.
pub struct ScoreboardService {
    leaderboard: Arc<dyn LeaderboardRepository>,
    history: Arc<dyn HistoryRepository>,
}

impl ScoreboardService {
    #[must_use]
    pub fn new(
        leaderboard: Arc<dyn LeaderboardRepository>,
        history: Arc<dyn HistoryRepository>,
    ) -> Self {
        Self {
            leaderboard,
            history,
        }
    }

    /// The top rows, highest score first, ties broken by username.
    ///
    /// # Errors
    ///
    /// Returns storage errors from the leaderboard load.
    pub async fn top(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, StorageError> {
        let board = self.leaderboard.load_leaderboard().await?;
        Ok(board.top(limit))
    }

    /// Every category log recorded for one user, category name order.
    ///
    /// # Errors
    ///
    /// Returns storage errors from the history load.
    pub async fn history_for(&self, username: &str) -> Result<Vec<CategoryHistory>, StorageError> {
        let history = self.history.load_history().await?;
        let Some(categories) = history.for_user(username) else {
            return Ok(Vec::new());
        };
        Ok(categories
            .iter()
            .map(|(category, scores)| CategoryHistory {
                category: category.clone(),
                scores: scores.clone(),
            })
            .collect())
    }
}

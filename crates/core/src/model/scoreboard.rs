use std::collections::BTreeMap;

//
// ─── LEADERBOARD ───────────────────────────────────────────────────────────────
//

/// One row of the leaderboard view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub username: String,
    pub score: u32,
}

/// Best-known score per user, independent of category.
///
/// `record` overwrites the previous entry with the latest run's score even
/// when it is lower. Keeping the latest rather than the best is the
/// documented behavior of this tool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Leaderboard {
    entries: BTreeMap<String, u32>,
}

impl Leaderboard {
    #[must_use]
    pub fn new(entries: BTreeMap<String, u32>) -> Self {
        Self { entries }
    }

    /// Overwrite the entry for `username` with the latest score.
    pub fn record(&mut self, username: impl Into<String>, score: u32) {
        self.entries.insert(username.into(), score);
    }

    #[must_use]
    pub fn score(&self, username: &str) -> Option<u32> {
        self.entries.get(username).copied()
    }

    /// Top `n` entries, highest score first; ties break by username so the
    /// ordering is stable.
    #[must_use]
    pub fn top(&self, n: usize) -> Vec<LeaderboardEntry> {
        let mut rows: Vec<LeaderboardEntry> = self
            .entries
            .iter()
            .map(|(username, score)| LeaderboardEntry {
                username: username.clone(),
                score: *score,
            })
            .collect();
        rows.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.username.cmp(&b.username))
        });
        rows.truncate(n);
        rows
    }

    #[must_use]
    pub fn entries(&self) -> &BTreeMap<String, u32> {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//
// ─── HISTORY ───────────────────────────────────────────────────────────────────
//

/// Append-only per-user, per-category score log across all sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    entries: BTreeMap<String, BTreeMap<String, Vec<u32>>>,
}

impl History {
    #[must_use]
    pub fn new(entries: BTreeMap<String, BTreeMap<String, Vec<u32>>>) -> Self {
        Self { entries }
    }

    /// Append one completed-session score under `username` / `category`.
    pub fn append(&mut self, username: impl Into<String>, category: impl Into<String>, score: u32) {
        self.entries
            .entry(username.into())
            .or_default()
            .entry(category.into())
            .or_default()
            .push(score);
    }

    /// Scores recorded for one user in one category, oldest first.
    #[must_use]
    pub fn scores(&self, username: &str, category: &str) -> &[u32] {
        self.entries
            .get(username)
            .and_then(|categories| categories.get(category))
            .map_or(&[], Vec::as_slice)
    }

    /// All category logs for one user.
    #[must_use]
    pub fn for_user(&self, username: &str) -> Option<&BTreeMap<String, Vec<u32>>> {
        self.entries.get(username)
    }

    #[must_use]
    pub fn entries(&self) -> &BTreeMap<String, BTreeMap<String, Vec<u32>>> {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

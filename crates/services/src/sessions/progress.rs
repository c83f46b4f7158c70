/// Snapshot of how far a session has come.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    /// Questions resolved, answered or timed out.
    pub answered: usize,
    pub score: u32,
    pub is_complete: bool,
}

impl SessionProgress {
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.answered)
    }

    /// Score as a fraction of the questions resolved so far.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        if self.answered == 0 {
            0.0
        } else {
            f64::from(self.score) / self.answered as f64
        }
    }
}

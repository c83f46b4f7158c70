/// Per-question time budget, in ticks.
pub const QUESTION_TIME_LIMIT: u32 = 20;

/// Result of advancing the countdown by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No countdown is armed; the tick was ignored.
    Idle,
    /// Still counting down.
    Running { remaining: u32 },
    /// The budget ran out on this tick.
    Expired,
}

/// Explicit per-question countdown.
///
/// A plain value the driving loop ticks at whatever cadence maps a tick to
/// its notion of a second. Nothing here schedules callbacks or spawns
/// threads; expiry is reported to the caller, who decides what it means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
    running: bool,
}

impl Countdown {
    /// A countdown that is not armed.
    #[must_use]
    pub fn idle() -> Self {
        Self {
            remaining: 0,
            running: false,
        }
    }

    /// Arm the countdown with a fresh budget, replacing any previous one.
    pub fn start(&mut self, duration: u32) {
        self.remaining = duration;
        self.running = duration > 0;
    }

    /// Disarm without expiring. Subsequent ticks are ignored.
    pub fn cancel(&mut self) {
        self.running = false;
    }

    /// Spend one tick of the budget.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.running {
            return TickOutcome::Idle;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.running = false;
            TickOutcome::Expired
        } else {
            TickOutcome::Running {
                remaining: self.remaining,
            }
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Ticks left, or `None` when disarmed.
    #[must_use]
    pub fn remaining(&self) -> Option<u32> {
        self.running.then_some(self.remaining)
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::idle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_down_to_expiry() {
        let mut countdown = Countdown::idle();
        countdown.start(3);

        assert_eq!(countdown.tick(), TickOutcome::Running { remaining: 2 });
        assert_eq!(countdown.tick(), TickOutcome::Running { remaining: 1 });
        assert_eq!(countdown.tick(), TickOutcome::Expired);
        assert!(!countdown.is_running());
    }

    #[test]
    fn cancel_stops_further_ticks() {
        let mut countdown = Countdown::idle();
        countdown.start(5);
        countdown.tick();
        countdown.cancel();

        assert_eq!(countdown.tick(), TickOutcome::Idle);
        assert_eq!(countdown.remaining(), None);
    }

    #[test]
    fn idle_countdown_ignores_ticks() {
        let mut countdown = Countdown::idle();
        assert_eq!(countdown.tick(), TickOutcome::Idle);
    }

    #[test]
    fn restart_replaces_previous_budget() {
        let mut countdown = Countdown::idle();
        countdown.start(2);
        countdown.tick();
        countdown.start(QUESTION_TIME_LIMIT);

        assert_eq!(countdown.remaining(), Some(QUESTION_TIME_LIMIT));
    }

    #[test]
    fn zero_duration_never_runs() {
        let mut countdown = Countdown::idle();
        countdown.start(0);
        assert!(!countdown.is_running());
        assert_eq!(countdown.tick(), TickOutcome::Idle);
    }
}

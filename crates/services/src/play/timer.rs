use chrono::{DateTime, Duration, Utc};

/// Cancellable schedule for the feedback auto-advance.
///
/// The timer never sleeps: it records a deadline against the injected
/// clock, and whoever drives the loop polls it (or fires it outright).
/// That keeps the advance deterministic under test and cancellable the
/// moment the player moves on manually.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvanceTimer {
    delay: Duration,
    deadline: Option<DateTime<Utc>>,
}

impl AdvanceTimer {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Schedule the advance for `now + delay`. Re-arming replaces the
    /// previous deadline.
    pub fn arm(&mut self, now: DateTime<Utc>) {
        self.deadline = Some(now + self.delay);
    }

    /// Disarm without firing.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    #[must_use]
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    /// Consume a due deadline. Returns true at most once per arming.
    pub fn fire_if_due(&mut self, now: DateTime<Utc>) -> bool {
        if self.is_due(now) {
            self.deadline = None;
            true
        } else {
            false
        }
    }

    /// Consume an armed deadline regardless of the clock, for skip
    /// buttons and test harnesses.
    pub fn fire_now(&mut self) -> bool {
        self.deadline.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::time::fixed_now;

    fn timer() -> AdvanceTimer {
        AdvanceTimer::new(Duration::seconds(2))
    }

    #[test]
    fn fires_once_at_the_deadline() {
        let mut timer = timer();
        let now = fixed_now();
        timer.arm(now);

        assert!(!timer.fire_if_due(now + Duration::seconds(1)));
        assert!(timer.is_armed());

        assert!(timer.fire_if_due(now + Duration::seconds(2)));
        assert!(!timer.is_armed());
        assert!(!timer.fire_if_due(now + Duration::seconds(10)));
    }

    #[test]
    fn cancel_disarms_before_the_deadline() {
        let mut timer = timer();
        let now = fixed_now();
        timer.arm(now);
        timer.cancel();

        assert!(!timer.is_armed());
        assert!(!timer.fire_if_due(now + Duration::minutes(1)));
    }

    #[test]
    fn fire_now_skips_the_wait() {
        let mut timer = timer();
        assert!(!timer.fire_now());

        timer.arm(fixed_now());
        assert!(timer.fire_now());
        assert!(!timer.fire_now());
    }

    #[test]
    fn rearming_replaces_the_deadline() {
        let mut timer = timer();
        let now = fixed_now();
        timer.arm(now);
        timer.arm(now + Duration::seconds(5));

        assert!(!timer.is_due(now + Duration::seconds(2)));
        assert!(timer.is_due(now + Duration::seconds(7)));
    }
}

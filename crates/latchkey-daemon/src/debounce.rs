//! Unlock cool-down.
//!
//! The gate is global: after any unlock, every read inside the window is
//! rejected, whatever card it came from. Only unlocks start a new window.

use std::time::Duration;

use tokio::time::Instant;

/// Whether a read at `now` is outside the window that started at `last`.
///
/// A `None` last trigger always passes.
pub fn allow(now: Instant, last: Option<Instant>, window: Duration) -> bool {
    match last {
        None => true,
        Some(last) => now.saturating_duration_since(last) >= window,
    }
}

/// Tracks the last unlock and applies [`allow`].
#[derive(Debug, Clone)]
pub struct DebounceGate {
    window: Duration,
    last_trigger: Option<Instant>,
}

impl DebounceGate {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_trigger: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// When the door was last unlocked.
    pub fn last_trigger(&self) -> Option<Instant> {
        self.last_trigger
    }

    /// Whether a read at `now` may proceed.
    pub fn check(&self, now: Instant) -> bool {
        allow(now, self.last_trigger, self.window)
    }

    /// Start a new window at `now`.
    ///
    /// Never moves the last trigger backwards.
    pub fn record(&mut self, now: Instant) {
        self.last_trigger = Some(match self.last_trigger {
            Some(last) => last.max(now),
            None => now,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const WINDOW: Duration = Duration::from_secs(5);

    #[rstest]
    #[case::well_inside(Duration::from_secs(2), false)]
    #[case::just_inside(Duration::from_millis(4900), false)]
    #[case::on_the_edge(Duration::from_secs(5), true)]
    #[case::just_outside(Duration::from_millis(5100), true)]
    fn test_allow(#[case] elapsed: Duration, #[case] expected: bool) {
        let last = Instant::now();
        assert_eq!(allow(last + elapsed, Some(last), WINDOW), expected);
    }

    #[test]
    fn test_allow_first_trigger() {
        assert!(allow(Instant::now(), None, WINDOW));
    }

    #[test]
    fn test_allow_clock_behind_last_trigger() {
        let last = Instant::now() + Duration::from_secs(1);
        assert!(!allow(Instant::now(), Some(last), WINDOW));
    }

    #[test]
    fn test_gate_records_trigger() {
        let mut gate = DebounceGate::new(WINDOW);
        let t0 = Instant::now();

        assert!(gate.check(t0));
        gate.record(t0);

        assert_eq!(gate.last_trigger(), Some(t0));
        assert!(!gate.check(t0 + Duration::from_secs(2)));
        assert!(gate.check(t0 + Duration::from_secs(6)));
    }

    #[test]
    fn test_gate_never_moves_backwards() {
        let mut gate = DebounceGate::new(WINDOW);
        let t0 = Instant::now();

        gate.record(t0 + Duration::from_secs(10));
        gate.record(t0);

        assert_eq!(gate.last_trigger(), Some(t0 + Duration::from_secs(10)));
    }

    #[test]
    fn test_zero_window_always_allows() {
        let mut gate = DebounceGate::new(Duration::ZERO);
        let t0 = Instant::now();
        gate.record(t0);
        assert!(gate.check(t0));
    }
}

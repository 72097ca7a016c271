//! Wall clock access and turn countdown
//!
//! The server sends its own `now` with every turn change. The difference to
//! the local clock at receipt is the skew; the countdown runs against the
//! skew-corrected deadline and ticks on local second boundaries.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::protocol::RoundPlayerUpdate;

/// Source of the current time
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// The system wall clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A settable clock for replays and tests; clones share the same time
#[derive(Clone, Debug)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub fn set(&self, at: DateTime<Utc>) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now = at;
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Deadline on the local clock for a turn update received at `received_at`
pub fn local_deadline(update: &RoundPlayerUpdate, received_at: DateTime<Utc>) -> DateTime<Utc> {
    let skew = received_at - update.server_now;
    update.sub_deadline.unwrap_or(update.deadline) + skew
}

/// Whole seconds left until `deadline`, never negative
pub fn remaining_seconds(deadline: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (deadline - now).num_milliseconds().max(0) / 1000
}

/// Delay until the next local wall-clock second boundary
pub fn until_next_second(now: DateTime<Utc>) -> Duration {
    let millis = u64::from(now.timestamp_subsec_millis() % 1000);
    Duration::from_millis(1000 - millis)
}

/// Countdown state for the current turn.
///
/// `sync` restarts the countdown and bumps the generation; a tick scheduled
/// under an older generation is stale and must be dropped by the caller.
#[derive(Clone, Debug, Default)]
pub struct TurnClock {
    deadline: Option<DateTime<Utc>>,
    displayed: Option<i64>,
    generation: u64,
}

impl TurnClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting down to a new local deadline
    pub fn sync(&mut self, deadline: Option<DateTime<Utc>>, now: DateTime<Utc>) -> u64 {
        self.deadline = deadline;
        self.displayed = deadline.map(|d| remaining_seconds(d, now));
        self.generation += 1;
        self.generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Value currently shown, `None` before the first turn
    pub fn displayed(&self) -> Option<i64> {
        self.displayed
    }

    pub fn remaining_at(&self, now: DateTime<Utc>) -> Option<i64> {
        self.deadline.map(|d| remaining_seconds(d, now))
    }

    /// Recompute the display; `true` when the shown value changed
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        let next = self.remaining_at(now);
        if next == self.displayed {
            return false;
        }
        self.displayed = next;
        true
    }

    /// More ticks are needed while time remains
    pub fn is_running(&self) -> bool {
        matches!(self.displayed, Some(s) if s > 0)
    }

    /// Delay to the next tick, `None` once the countdown reached zero
    pub fn next_tick_delay(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.is_running().then(|| until_next_second(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
    }

    fn update(deadline_s: i64, sub: Option<i64>) -> RoundPlayerUpdate {
        RoundPlayerUpdate {
            player: "ana".to_string(),
            deadline: t0() + chrono::Duration::seconds(deadline_s),
            server_now: t0(),
            sub_deadline: sub.map(|s| t0() + chrono::Duration::seconds(s)),
        }
    }

    #[test]
    fn test_skew_applied() {
        // local clock runs 5s ahead of the server
        let received = t0() + chrono::Duration::seconds(5);
        let deadline = local_deadline(&update(30, None), received);
        assert_eq!(deadline, t0() + chrono::Duration::seconds(35));
        assert_eq!(remaining_seconds(deadline, received), 30);
    }

    #[test]
    fn test_sub_deadline_wins() {
        let deadline = local_deadline(&update(60, Some(15)), t0());
        assert_eq!(deadline, t0() + chrono::Duration::seconds(15));
    }

    #[test]
    fn test_remaining_floors_and_clamps() {
        let deadline = t0() + chrono::Duration::milliseconds(2_999);
        assert_eq!(remaining_seconds(deadline, t0()), 2);
        assert_eq!(remaining_seconds(t0(), deadline), 0);
    }

    #[test]
    fn test_next_second_alignment() {
        let now = t0() + chrono::Duration::milliseconds(250);
        assert_eq!(until_next_second(now), Duration::from_millis(750));
        assert_eq!(until_next_second(t0()), Duration::from_millis(1000));
    }

    #[test]
    fn test_countdown_monotonic_to_zero() {
        let mut clock = TurnClock::new();
        clock.sync(Some(local_deadline(&update(30, None), t0())), t0());
        assert_eq!(clock.displayed(), Some(30));

        let mut last = 30;
        let mut now = t0();
        while let Some(delay) = clock.next_tick_delay(now) {
            now += chrono::Duration::from_std(delay).unwrap();
            clock.tick(now);
            let shown = clock.displayed().unwrap();
            assert!(shown <= last && shown >= 0);
            last = shown;
        }
        assert_eq!(last, 0);
        assert!(!clock.tick(now + chrono::Duration::seconds(10)));
    }

    #[test]
    fn test_sync_restarts() {
        let mut clock = TurnClock::new();
        let first = clock.sync(Some(t0() + chrono::Duration::seconds(30)), t0());
        let second = clock.sync(Some(t0() + chrono::Duration::seconds(90)), t0());
        assert!(second > first);
        assert_eq!(clock.displayed(), Some(90));
    }

    #[test]
    fn test_manual_clock_shared() {
        let clock = ManualClock::new(t0());
        let other = clock.clone();
        clock.advance(chrono::Duration::seconds(3));
        assert_eq!(other.now(), t0() + chrono::Duration::seconds(3));
    }
}

use chrono::{Duration, NaiveDateTime};

/// Next fire times of the update and display actions.
///
/// Each cursor is advanced from the instant its action ran, not from its
/// previous value, so a stalled tick never triggers a burst of catch-up runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSchedule {
    pub next_update_at: NaiveDateTime,
    pub next_display_at: NaiveDateTime,
}

impl TickSchedule {
    /// Both actions due on the first tick.
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            next_update_at: now,
            next_display_at: now,
        }
    }

    pub fn update_due(&self, now: NaiveDateTime) -> bool {
        now >= self.next_update_at
    }

    pub fn display_due(&self, now: NaiveDateTime) -> bool {
        now >= self.next_display_at
    }

    pub fn update_ran(&mut self, now: NaiveDateTime, interval: Duration) {
        self.next_update_at = now + interval;
    }

    pub fn display_ran(&mut self, now: NaiveDateTime, interval: Duration) {
        self.next_display_at = now + interval;
    }

    pub fn force_update(&mut self, now: NaiveDateTime) {
        self.next_update_at = now;
    }

    pub fn force_display(&mut self, now: NaiveDateTime) {
        self.next_display_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn t0() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    #[test]
    fn both_due_initially() {
        let s = TickSchedule::new(t0());
        assert!(s.update_due(t0()));
        assert!(s.display_due(t0()));
    }

    #[test]
    fn cursors_advance_independently() {
        let mut s = TickSchedule::new(t0());
        s.update_ran(t0(), Duration::seconds(2));
        s.display_ran(t0(), Duration::milliseconds(500));
        let later = t0() + Duration::milliseconds(600);
        assert!(!s.update_due(later));
        assert!(s.display_due(later));
    }

    #[test]
    fn stall_does_not_cause_catch_up() {
        let mut s = TickSchedule::new(t0());
        s.update_ran(t0(), Duration::seconds(2));
        let stalled = t0() + Duration::seconds(30);
        assert!(s.update_due(stalled));
        s.update_ran(stalled, Duration::seconds(2));
        assert!(!s.update_due(stalled + Duration::milliseconds(200)));
    }

    #[test]
    fn force_makes_action_due() {
        let mut s = TickSchedule::new(t0());
        s.update_ran(t0(), Duration::seconds(2));
        s.force_update(t0());
        assert!(s.update_due(t0()));
    }
}

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::schedule::PauseDecision;

/// Every state change in the system produces an Event.
/// The activity loop and the dispatcher log them; `check --json` prints them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Event {
    AutoPauseArmed {
        deadline: NaiveDateTime,
        at: NaiveDateTime,
    },
    AutoPauseDisarmed {
        at: NaiveDateTime,
    },
    /// Duration changed; `deadline` is the recomputed one when armed.
    AutoPauseDurationChanged {
        duration_secs: Option<i64>,
        deadline: Option<NaiveDateTime>,
        at: NaiveDateTime,
    },
    AutoPauseReset {
        duration_secs: Option<i64>,
        at: NaiveDateTime,
    },
    /// Countdown set to expire immediately.
    AutoPauseForced {
        at: NaiveDateTime,
    },
    PointerNudged {
        dx: i32,
        dy: i32,
        at: NaiveDateTime,
    },
    UpdatePaused {
        decision: PauseDecision,
        reason: String,
        at: NaiveDateTime,
    },
    /// Countdown reached zero; the next tick re-evaluates the schedule.
    AutoPauseExpired {
        at: NaiveDateTime,
    },
}

impl Event {
    /// True for events that change the configured duration or the deadline
    /// in a way the status line should reflect right away.
    pub fn refreshes_status(&self) -> bool {
        matches!(
            self,
            Event::AutoPauseArmed { .. }
                | Event::AutoPauseDisarmed { .. }
                | Event::AutoPauseDurationChanged { .. }
                | Event::AutoPauseReset { .. }
                | Event::AutoPauseForced { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn serializes_with_type_tag() {
        let at = NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let json = serde_json::to_value(Event::PointerNudged { dx: -1, dy: 1, at }).unwrap();
        assert_eq!(json["type"], "PointerNudged");
        assert_eq!(json["dx"], -1);
        assert_eq!(json["at"], "2026-10-19T09:30:00");
    }
}

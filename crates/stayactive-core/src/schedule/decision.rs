use chrono::{NaiveDateTime, NaiveTime};
use serde::Serialize;
use std::fmt;

/// Outcome of evaluating the schedule at one instant.
///
/// Produced fresh on every update; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PauseDecision {
    Active,
    PausedWeekend,
    PausedBeforeWork { start: NaiveTime },
    PausedAfterWork { end: NaiveTime },
    PausedLunch { start: NaiveTime, end: NaiveTime },
    PausedAutoPause { deadline: NaiveDateTime },
}

impl PauseDecision {
    pub fn is_paused(&self) -> bool {
        !matches!(self, PauseDecision::Active)
    }

    /// Short machine-friendly name.
    pub fn kind(&self) -> &'static str {
        match self {
            PauseDecision::Active => "active",
            PauseDecision::PausedWeekend => "paused_weekend",
            PauseDecision::PausedBeforeWork { .. } => "paused_before_work",
            PauseDecision::PausedAfterWork { .. } => "paused_after_work",
            PauseDecision::PausedLunch { .. } => "paused_lunch",
            PauseDecision::PausedAutoPause { .. } => "paused_auto_pause",
        }
    }
}

impl fmt::Display for PauseDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PauseDecision::Active => write!(f, "ACTIVE"),
            PauseDecision::PausedWeekend => write!(f, "UPDATE PAUSED - WEEKEND"),
            PauseDecision::PausedBeforeWork { start } => {
                write!(f, "UPDATE PAUSED - before work start: {}", start.format("%H:%M"))
            }
            PauseDecision::PausedAfterWork { end } => {
                write!(f, "UPDATE PAUSED - after work end: {}", end.format("%H:%M"))
            }
            PauseDecision::PausedLunch { start, end } => write!(
                f,
                "UPDATE PAUSED - lunch: {} - {}",
                start.format("%H:%M"),
                end.format("%H:%M")
            ),
            PauseDecision::PausedAutoPause { deadline } => {
                write!(f, "UPDATE PAUSED - auto pause: {}", deadline.format("%H:%M"))
            }
        }
    }
}

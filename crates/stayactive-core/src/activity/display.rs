//! Status lines produced by the activity loop.
//!
//! The loop never talks to a terminal directly. It produces
//! `(row, text, tone)` triples and hands them to a [`DisplaySink`].

use chrono::{Duration, NaiveDateTime};

use crate::error::DisplayError;
use crate::timer::AutoPauseState;

/// Row of the update report (nudge offset or pause reason).
pub const UPDATE_ROW: u16 = 0;
/// Row of the auto-pause countdown.
pub const AUTO_PAUSE_ROW: u16 = 2;
/// Row of the key legend.
pub const LEGEND_ROW: u16 = 4;
/// Every rendered line is padded or cut to this many columns.
pub const LINE_WIDTH: usize = 70;

/// Visual weight of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Default colors.
    Plain,
    /// Countdown not started.
    Idle,
    /// Remaining ≥ 10 minutes.
    Normal,
    /// Remaining < 10 minutes.
    Warning,
    /// Remaining < 1 minute.
    Critical,
}

impl Tone {
    /// Severity tier for a remaining countdown.
    pub fn for_remaining(remaining: Duration) -> Self {
        if remaining < Duration::minutes(1) {
            Tone::Critical
        } else if remaining < Duration::minutes(10) {
            Tone::Warning
        } else {
            Tone::Normal
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub row: u16,
    pub text: String,
    pub tone: Tone,
}

impl StatusLine {
    pub fn new(row: u16, text: impl AsRef<str>, tone: Tone) -> Self {
        Self {
            row,
            text: fit_width(text.as_ref(), LINE_WIDTH),
            tone,
        }
    }
}

/// Where status lines end up.
pub trait DisplaySink: Send {
    fn render(&mut self, line: &StatusLine) -> Result<(), DisplayError>;
    fn clear(&mut self) -> Result<(), DisplayError>;
}

/// Pad with spaces or truncate so the text is exactly `width` characters.
pub fn fit_width(text: &str, width: usize) -> String {
    let mut out: String = text.chars().take(width).collect();
    let len = out.chars().count();
    out.extend(std::iter::repeat(' ').take(width - len));
    out
}

fn hm(d: Duration) -> String {
    format!("{:02}h  {:02}m", d.num_hours(), d.num_minutes() % 60)
}

/// The update report for a nudge.
pub fn nudge_line(dx: i32, dy: i32) -> StatusLine {
    StatusLine::new(UPDATE_ROW, format!("x={dx:4}, y={dy:4}"), Tone::Plain)
}

/// The countdown line for `state` at `now`.
///
/// A "never" duration renders as a blank line.
pub fn auto_pause_line(state: &AutoPauseState, now: NaiveDateTime) -> StatusLine {
    let Some(configured) = state.configured else {
        return StatusLine::new(AUTO_PAUSE_ROW, "", Tone::Plain);
    };

    match (state.deadline, state.remaining(now)) {
        (Some(deadline), Some(remaining)) => StatusLine::new(
            AUTO_PAUSE_ROW,
            format!(
                "AutoPause: {}   =>  remaining: {:02}h  {:02}m  {:02}s  => {}",
                hm(configured),
                remaining.num_hours(),
                remaining.num_minutes() % 60,
                remaining.num_seconds() % 60,
                deadline.format("%H:%M:%S")
            ),
            Tone::for_remaining(remaining),
        ),
        _ => StatusLine::new(
            AUTO_PAUSE_ROW,
            format!("AutoPause: {}   =>  NOT STARTED (start with [S])", hm(configured)),
            Tone::Idle,
        ),
    }
}

/// One-line key legend.
pub fn legend_line() -> StatusLine {
    StatusLine::new(
        LEGEND_ROW,
        "[S] start/stop  [R] pause now  [0-9] preset  [+/-] adjust  [C] clear  [X] quit",
        Tone::Plain,
    )
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
    fn fit_width_pads_and_truncates() {
        assert_eq!(fit_width("ab", 4), "ab  ");
        assert_eq!(fit_width("abcdef", 4), "abcd");
        assert_eq!(fit_width("", 3), "   ");
    }

    #[test]
    fn lines_are_exactly_line_width() {
        let line = StatusLine::new(0, "x".repeat(200), Tone::Plain);
        assert_eq!(line.text.chars().count(), LINE_WIDTH);
        assert_eq!(legend_line().text.chars().count(), LINE_WIDTH);
    }

    #[test]
    fn nudge_report_is_right_aligned() {
        assert!(nudge_line(-2, 1).text.starts_with("x=  -2, y=   1"));
    }

    #[test]
    fn tiers_follow_remaining() {
        assert_eq!(Tone::for_remaining(Duration::minutes(10)), Tone::Normal);
        assert_eq!(Tone::for_remaining(Duration::minutes(9)), Tone::Warning);
        assert_eq!(Tone::for_remaining(Duration::seconds(59)), Tone::Critical);
        assert_eq!(Tone::for_remaining(Duration::zero()), Tone::Critical);
    }

    #[test]
    fn not_started_line() {
        let line = auto_pause_line(&AutoPauseState::default(), t0());
        assert_eq!(line.row, AUTO_PAUSE_ROW);
        assert_eq!(line.tone, Tone::Idle);
        assert!(line
            .text
            .starts_with("AutoPause: 00h  30m   =>  NOT STARTED (start with [S])"));
    }

    #[test]
    fn armed_line_shows_remaining_and_deadline() {
        let state = AutoPauseState {
            configured: Some(Duration::minutes(90)),
            deadline: Some(t0() + Duration::minutes(90)),
        };
        let line = auto_pause_line(&state, t0() + Duration::seconds(5));
        assert!(line
            .text
            .starts_with("AutoPause: 01h  30m   =>  remaining: 01h  29m  55s  => 10:30:00"));
        assert_eq!(line.tone, Tone::Normal);
    }

    #[test]
    fn expired_line_is_critical_at_zero() {
        let state = AutoPauseState {
            configured: Some(Duration::minutes(30)),
            deadline: Some(t0()),
        };
        let line = auto_pause_line(&state, t0() + Duration::minutes(3));
        assert!(line.text.contains("remaining: 00h  00m  00s"));
        assert_eq!(line.tone, Tone::Critical);
    }

    #[test]
    fn never_renders_blank() {
        let state = AutoPauseState {
            configured: None,
            deadline: None,
        };
        let line = auto_pause_line(&state, t0());
        assert_eq!(line.text.trim(), "");
    }
}

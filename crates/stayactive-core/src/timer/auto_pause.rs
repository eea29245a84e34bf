//! Auto-pause countdown.
//!
//! The countdown is a wall-clock deadline. Arming it stores
//! `now + configured_duration`; once the clock passes the deadline the
//! schedule evaluator reports `PausedAutoPause` until the user disarms it.
//!
//! ## State
//!
//! ```text
//! deadline: None --toggle--> Some(now + duration) --toggle--> None
//!                 force_resume_now: Some(now), duration = 30 min
//! ```
//!
//! The configured duration is always inside the clamp bounds, or "never"
//! (`None`), in which case the countdown cannot be armed until a duration
//! key seeds it.

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

use crate::events::Event;

/// Duration the controller starts with and returns to on reset, in minutes.
pub const DEFAULT_MINUTES: i64 = 30;
/// Duration set by the force-resume shortcut, in minutes.
pub const FORCE_RESUME_MINUTES: i64 = 30;
/// Lower clamp bound, in minutes.
pub const MIN_MINUTES: i64 = 1;
/// Upper clamp bound, in minutes.
pub const MAX_MINUTES: i64 = 12 * 60;

/// Clamp bounds and the starting duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationLimits {
    pub min: Duration,
    pub max: Duration,
    /// Starting duration; `None` is "never".
    pub initial: Option<Duration>,
}

impl Default for DurationLimits {
    fn default() -> Self {
        Self {
            min: Duration::minutes(MIN_MINUTES),
            max: Duration::minutes(MAX_MINUTES),
            initial: Some(Duration::minutes(DEFAULT_MINUTES)),
        }
    }
}

impl DurationLimits {
    pub fn clamp(&self, d: Duration) -> Duration {
        d.clamp(self.min, self.max)
    }
}

/// Snapshot of the countdown. Copied out of the lock for evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AutoPauseState {
    /// `None` is "never": the countdown cannot be armed.
    #[serde(serialize_with = "serialize_opt_duration")]
    pub configured: Option<Duration>,
    /// `None` is unset: the countdown is not running.
    pub deadline: Option<NaiveDateTime>,
}

fn serialize_opt_duration<S: serde::Serializer>(
    d: &Option<Duration>,
    s: S,
) -> Result<S::Ok, S::Error> {
    match d {
        Some(d) => s.serialize_some(&d.num_seconds()),
        None => s.serialize_none(),
    }
}

impl Default for AutoPauseState {
    fn default() -> Self {
        Self {
            configured: Some(Duration::minutes(DEFAULT_MINUTES)),
            deadline: None,
        }
    }
}

impl AutoPauseState {
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Time left before the deadline, never negative. `None` when not armed.
    pub fn remaining(&self, now: NaiveDateTime) -> Option<Duration> {
        self.deadline
            .map(|deadline| (deadline - now).max(Duration::zero()))
    }
}

/// Size of one increment/decrement press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjustStep {
    /// 15 min steps; seeds 15 min from "never".
    Coarse,
    /// 1 min steps; seeds 60 min from "never".
    Fine,
}

impl AdjustStep {
    fn delta(self) -> Duration {
        match self {
            AdjustStep::Coarse => Duration::minutes(15),
            AdjustStep::Fine => Duration::minutes(1),
        }
    }

    fn seed(self) -> Duration {
        match self {
            AdjustStep::Coarse => Duration::minutes(15),
            AdjustStep::Fine => Duration::minutes(60),
        }
    }
}

/// Owns the countdown state. Every mutation goes through here.
#[derive(Debug, Clone)]
pub struct AutoPauseController {
    state: AutoPauseState,
    limits: DurationLimits,
}

impl Default for AutoPauseController {
    fn default() -> Self {
        Self::new(DurationLimits::default())
    }
}

impl AutoPauseController {
    pub fn new(limits: DurationLimits) -> Self {
        Self {
            state: AutoPauseState {
                configured: limits.initial.map(|d| limits.clamp(d)),
                deadline: None,
            },
            limits,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> AutoPauseState {
        self.state
    }

    pub fn limits(&self) -> DurationLimits {
        self.limits
    }

    pub fn configured(&self) -> Option<Duration> {
        self.state.configured
    }

    pub fn deadline(&self) -> Option<NaiveDateTime> {
        self.state.deadline
    }

    pub fn remaining(&self, now: NaiveDateTime) -> Option<Duration> {
        self.state.remaining(now)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Arm the countdown when unset, disarm it when set.
    ///
    /// Does nothing while the duration is "never".
    pub fn toggle_auto_pause(&mut self, now: NaiveDateTime) -> Option<Event> {
        let configured = self.state.configured?;
        match self.state.deadline {
            None => {
                let deadline = now + configured;
                self.state.deadline = Some(deadline);
                tracing::info!(%deadline, "auto-pause armed");
                Some(Event::AutoPauseArmed { deadline, at: now })
            }
            Some(_) => {
                self.state.deadline = None;
                tracing::info!("auto-pause disarmed");
                Some(Event::AutoPauseDisarmed { at: now })
            }
        }
    }

    /// Replace the configured duration, clamped to the limits.
    ///
    /// An armed countdown restarts from `now` with the new duration. Returns
    /// `None` when the clamped value equals the current one.
    pub fn set_configured_duration(&mut self, d: Duration, now: NaiveDateTime) -> Option<Event> {
        self.apply_duration(Some(self.limits.clamp(d)), now)
    }

    /// Add `delta` (signed) to the duration, or set it to `init` when it is
    /// "never". The result is clamped.
    pub fn step(&mut self, delta: Duration, init: Duration, now: NaiveDateTime) -> Option<Event> {
        let next = match self.state.configured {
            None => init,
            Some(current) => current + delta,
        };
        self.set_configured_duration(next, now)
    }

    /// One increment or decrement press.
    pub fn adjust(&mut self, step: AdjustStep, increase: bool, now: NaiveDateTime) -> Option<Event> {
        let delta = if increase { step.delta() } else { -step.delta() };
        self.step(delta, step.seed(), now)
    }

    /// Back to the starting duration with the countdown disarmed.
    pub fn reset(&mut self, now: NaiveDateTime) -> Option<Event> {
        let before = self.state;
        self.state.deadline = None;
        let changed = self.apply_duration(self.limits.initial.map(|d| self.limits.clamp(d)), now);
        if changed.is_none() && before == self.state {
            return None;
        }
        Some(Event::AutoPauseReset {
            duration_secs: self.state.configured.map(|d| d.num_seconds()),
            at: now,
        })
    }

    /// Pause right now: 30 min duration, deadline already expired.
    pub fn force_resume_now(&mut self, now: NaiveDateTime) -> Option<Event> {
        self.state.configured = Some(self.limits.clamp(Duration::minutes(FORCE_RESUME_MINUTES)));
        self.state.deadline = Some(now);
        tracing::info!("auto-pause forced");
        Some(Event::AutoPauseForced { at: now })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn apply_duration(&mut self, next: Option<Duration>, now: NaiveDateTime) -> Option<Event> {
        if next == self.state.configured {
            return None;
        }
        self.state.configured = next;
        if self.state.deadline.is_some() {
            self.state.deadline = next.map(|d| now + d);
        }
        tracing::debug!(
            minutes = next.map(|d| d.num_minutes()),
            deadline = ?self.state.deadline,
            "auto-pause duration changed"
        );
        Some(Event::AutoPauseDurationChanged {
            duration_secs: next.map(|d| d.num_seconds()),
            deadline: self.state.deadline,
            at: now,
        })
    }
}

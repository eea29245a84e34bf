//! Background activity loop.
//!
//! Wakes every `tick` and runs two actions when their cursors are due:
//!
//! - **update** (every `update`): evaluate the schedule; nudge the pointer by
//!   a random offset when active, otherwise report why it is paused.
//! - **display** (every `display`): render the auto-pause countdown. When an
//!   armed countdown reaches zero the update action is pulled forward so the
//!   pause takes effect on the next tick.
//!
//! A nudge or render failure ends the loop. Cancellation is checked at the
//! top of every tick.

mod display;
mod nudge;
mod tick;

pub use display::{
    auto_pause_line, fit_width, legend_line, nudge_line, DisplaySink, StatusLine, Tone,
    AUTO_PAUSE_ROW, LEGEND_ROW, LINE_WIDTH, UPDATE_ROW,
};
pub use nudge::{platform_nudger, DryRunNudger, PointerNudger};
#[cfg(windows)]
pub use nudge::SendInputNudger;
pub use tick::TickSchedule;

use chrono::{Duration, NaiveDateTime};
use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::clock::Clock;
use crate::error::Result;
use crate::events::Event;
use crate::schedule::ScheduleEvaluator;
use crate::timer::SharedAutoPause;

/// Loop cadences and nudge parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopTiming {
    /// Wake-up interval.
    pub tick: std::time::Duration,
    pub update: Duration,
    pub display: Duration,
    /// Offsets are drawn from `[-nudge_range, nudge_range)`.
    pub nudge_range: i32,
    pub seed: Option<u64>,
}

impl Default for LoopTiming {
    fn default() -> Self {
        Self {
            tick: std::time::Duration::from_millis(200),
            update: Duration::seconds(2),
            display: Duration::milliseconds(500),
            nudge_range: 2,
            seed: None,
        }
    }
}

/// Requests from the dispatcher to the loop.
///
/// The tick cursors stay owned by the loop; the dispatcher only raises
/// flags and wakes it up.
#[derive(Debug, Default)]
pub struct LoopSignals {
    refresh: AtomicBool,
    clear: AtomicBool,
    wake: Notify,
}

impl LoopSignals {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Render the countdown on the next tick.
    pub fn request_refresh(&self) {
        self.refresh.store(true, Ordering::SeqCst);
        self.wake.notify_one();
    }

    /// Clear the screen and redraw everything on the next tick.
    pub fn request_clear(&self) {
        self.clear.store(true, Ordering::SeqCst);
        self.wake.notify_one();
    }

    fn take_refresh(&self) -> bool {
        self.refresh.swap(false, Ordering::SeqCst)
    }

    fn take_clear(&self) -> bool {
        self.clear.swap(false, Ordering::SeqCst)
    }
}

pub struct ActivityLoop {
    evaluator: ScheduleEvaluator,
    auto_pause: SharedAutoPause,
    nudger: Box<dyn PointerNudger>,
    display: Box<dyn DisplaySink>,
    clock: Arc<dyn Clock>,
    signals: Arc<LoopSignals>,
    timing: LoopTiming,
    schedule: Option<TickSchedule>,
    rng: Mcg128Xsl64,
    /// Deadline whose expiry was already reported.
    expired: Option<NaiveDateTime>,
    /// Last update report, redrawn after a screen clear.
    last_update: Option<StatusLine>,
}

impl ActivityLoop {
    pub fn new(
        evaluator: ScheduleEvaluator,
        auto_pause: SharedAutoPause,
        nudger: Box<dyn PointerNudger>,
        display: Box<dyn DisplaySink>,
        clock: Arc<dyn Clock>,
        signals: Arc<LoopSignals>,
        timing: LoopTiming,
    ) -> Self {
        let rng = match timing.seed {
            Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
            None => Mcg128Xsl64::from_entropy(),
        };
        Self {
            evaluator,
            auto_pause,
            nudger,
            display,
            clock,
            signals,
            timing,
            schedule: None,
            rng,
            expired: None,
            last_update: None,
        }
    }

    pub fn schedule(&self) -> Option<TickSchedule> {
        self.schedule
    }

    /// Run until `cancel` fires or a tick fails.
    ///
    /// A failure cancels `cancel` as well, so the input side stops too.
    pub async fn run(mut self, cancel: CancellationToken) -> Result<()> {
        let mut ticker = tokio::time::interval(self.timing.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::info!(nudger = self.nudger.name(), "activity loop started");

        let signals = Arc::clone(&self.signals);
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
                _ = signals.wake.notified() => {}
            }
            if cancel.is_cancelled() {
                break;
            }

            let now = self.clock.now();
            if let Err(err) = self.tick(now) {
                tracing::error!(error = %err, "activity loop tick failed");
                cancel.cancel();
                return Err(err);
            }
        }

        tracing::info!("activity loop stopped");
        Ok(())
    }

    /// One tick: handle dispatcher requests, then run due actions.
    pub fn tick(&mut self, now: NaiveDateTime) -> Result<Vec<Event>> {
        let mut events = Vec::new();
        let first = self.schedule.is_none();
        let mut schedule = *self.schedule.get_or_insert_with(|| TickSchedule::new(now));

        if self.signals.take_clear() {
            self.display.clear()?;
            self.display.render(&legend_line())?;
            if let Some(line) = &self.last_update {
                self.display.render(line)?;
            }
            schedule.force_display(now);
        } else if first {
            self.display.render(&legend_line())?;
        }
        if self.signals.take_refresh() {
            schedule.force_display(now);
        }

        if schedule.update_due(now) {
            events.push(self.update(now)?);
            schedule.update_ran(now, self.timing.update);
        }

        if schedule.display_due(now) {
            if let Some(expired) = self.display_status(now)? {
                schedule.force_update(now);
                events.push(expired);
            }
            schedule.display_ran(now, self.timing.display);
        }

        self.schedule = Some(schedule);
        Ok(events)
    }

    fn update(&mut self, now: NaiveDateTime) -> Result<Event> {
        let state = self.auto_pause.snapshot();
        let decision = self.evaluator.evaluate(now, &state);

        if decision.is_paused() {
            let reason = decision.to_string();
            self.show_update(StatusLine::new(UPDATE_ROW, &reason, Tone::Plain))?;
            tracing::debug!(kind = decision.kind(), "update paused");
            return Ok(Event::UpdatePaused {
                decision,
                reason,
                at: now,
            });
        }

        let range = self.timing.nudge_range;
        let dx = self.rng.gen_range(-range..range);
        let dy = self.rng.gen_range(-range..range);
        self.nudger.nudge(dx, dy)?;
        self.show_update(nudge_line(dx, dy))?;
        Ok(Event::PointerNudged { dx, dy, at: now })
    }

    fn show_update(&mut self, line: StatusLine) -> Result<()> {
        self.display.render(&line)?;
        self.last_update = Some(line);
        Ok(())
    }

    /// Render the countdown. Returns an event the first time an armed
    /// countdown is seen at zero.
    fn display_status(&mut self, now: NaiveDateTime) -> Result<Option<Event>> {
        let state = self.auto_pause.snapshot();
        self.display.render(&auto_pause_line(&state, now))?;

        let expired = state.remaining(now) == Some(Duration::zero());
        if !expired || state.deadline == self.expired {
            return Ok(None);
        }
        self.expired = state.deadline;
        tracing::info!(deadline = ?state.deadline, "auto-pause expired, forcing update");
        Ok(Some(Event::AutoPauseExpired { at: now }))
    }
}

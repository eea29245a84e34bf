//! Work schedule evaluation.
//!
//! Decides, for a given local instant, whether activity should be suppressed
//! and why. The decision is the first match of an ordered rule table:
//!
//! ```text
//! weekend -> short-day end -> work end -> work start -> lunch -> auto-pause -> active
//! ```
//!
//! The table is built once from [`WorkHours`] and never changes at runtime.

mod decision;

pub use decision::PauseDecision;

use chrono::{Datelike, NaiveDateTime, NaiveTime, Weekday};

use crate::timer::AutoPauseState;

/// Weekly work-hours table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkHours {
    pub start: NaiveTime,
    pub end: NaiveTime,
    /// Day that ends early, with its early end.
    pub short_day: Option<(Weekday, NaiveTime)>,
    /// Inclusive lunch interval.
    pub lunch: (NaiveTime, NaiveTime),
    pub weekend: Vec<Weekday>,
}

impl Default for WorkHours {
    fn default() -> Self {
        let hm = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap_or_default();
        Self {
            start: hm(7, 0),
            end: hm(18, 30),
            short_day: Some((Weekday::Fri, hm(17, 30))),
            lunch: (hm(11, 45), hm(12, 30)),
            weekend: vec![Weekday::Sat, Weekday::Sun],
        }
    }
}

impl WorkHours {
    fn is_weekend(&self, day: Weekday) -> bool {
        self.weekend.contains(&day)
    }

    fn is_short_day(&self, day: Weekday) -> bool {
        matches!(self.short_day, Some((short, _)) if short == day)
    }
}

type RuleFn = fn(&WorkHours, NaiveDateTime, &AutoPauseState) -> Option<PauseDecision>;

/// One entry of the rule table.
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    check: RuleFn,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

fn weekend(hours: &WorkHours, now: NaiveDateTime, _: &AutoPauseState) -> Option<PauseDecision> {
    hours
        .is_weekend(now.weekday())
        .then_some(PauseDecision::PausedWeekend)
}

fn short_day_end(hours: &WorkHours, now: NaiveDateTime, _: &AutoPauseState) -> Option<PauseDecision> {
    match hours.short_day {
        Some((day, end)) if now.weekday() == day && now.time() > end => {
            Some(PauseDecision::PausedAfterWork { end })
        }
        _ => None,
    }
}

fn work_end(hours: &WorkHours, now: NaiveDateTime, _: &AutoPauseState) -> Option<PauseDecision> {
    let normal_day = !hours.is_short_day(now.weekday());
    (normal_day && now.time() > hours.end).then_some(PauseDecision::PausedAfterWork { end: hours.end })
}

fn work_start(hours: &WorkHours, now: NaiveDateTime, _: &AutoPauseState) -> Option<PauseDecision> {
    (now.time() < hours.start).then_some(PauseDecision::PausedBeforeWork { start: hours.start })
}

fn lunch(hours: &WorkHours, now: NaiveDateTime, _: &AutoPauseState) -> Option<PauseDecision> {
    let (start, end) = hours.lunch;
    let t = now.time();
    (start <= t && t <= end).then_some(PauseDecision::PausedLunch { start, end })
}

fn auto_pause(_: &WorkHours, now: NaiveDateTime, state: &AutoPauseState) -> Option<PauseDecision> {
    state
        .deadline
        .filter(|deadline| now >= *deadline)
        .map(|deadline| PauseDecision::PausedAutoPause { deadline })
}

/// The rule table in priority order. First match wins.
pub const RULES: [Rule; 6] = [
    Rule { name: "weekend", check: weekend },
    Rule { name: "short_day_end", check: short_day_end },
    Rule { name: "work_end", check: work_end },
    Rule { name: "work_start", check: work_start },
    Rule { name: "lunch", check: lunch },
    Rule { name: "auto_pause", check: auto_pause },
];

/// Pure schedule evaluator over an immutable work-hours table.
#[derive(Debug, Clone)]
pub struct ScheduleEvaluator {
    hours: WorkHours,
    rules: Vec<Rule>,
}

impl Default for ScheduleEvaluator {
    fn default() -> Self {
        Self::new(WorkHours::default())
    }
}

impl ScheduleEvaluator {
    pub fn new(hours: WorkHours) -> Self {
        Self {
            hours,
            rules: RULES.to_vec(),
        }
    }

    pub fn hours(&self) -> &WorkHours {
        &self.hours
    }

    /// Evaluate the schedule at `now`. Total over all instants.
    pub fn evaluate(&self, now: NaiveDateTime, auto_pause: &AutoPauseState) -> PauseDecision {
        self.evaluate_with_rule(now, auto_pause).1
    }

    /// Like [`evaluate`](Self::evaluate), also naming the rule that matched.
    pub fn evaluate_with_rule(
        &self,
        now: NaiveDateTime,
        auto_pause: &AutoPauseState,
    ) -> (&'static str, PauseDecision) {
        self.rules
            .iter()
            .find_map(|rule| (rule.check)(&self.hours, now, auto_pause).map(|d| (rule.name, d)))
            .unwrap_or(("active", PauseDecision::Active))
    }
}

//! Integration tests for the activity loop.
//!
//! Drives the loop and the command dispatcher together through the public
//! API, with a manual clock and recording capabilities.

use std::sync::{Arc, Mutex};

use chrono::{Duration, NaiveDate, NaiveDateTime};
use stayactive_core::activity::AUTO_PAUSE_ROW;
use stayactive_core::error::{DisplayError, NudgeError};
use stayactive_core::{
    ActivityLoop, AutoPauseController, Clock, CommandDispatcher, Config, DisplaySink, Event,
    KeyInput, LoopSignals, ManualClock, PauseDecision, PointerNudger, ScheduleEvaluator,
    SharedAutoPause, StatusLine, Tone,
};

#[derive(Clone, Default)]
struct Nudges(Arc<Mutex<usize>>);

impl PointerNudger for Nudges {
    fn nudge(&mut self, _dx: i32, _dy: i32) -> Result<(), NudgeError> {
        *self.0.lock().unwrap() += 1;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "count"
    }
}

#[derive(Clone, Default)]
struct Screen(Arc<Mutex<Vec<StatusLine>>>);

impl Screen {
    fn last(&self, row: u16) -> Option<StatusLine> {
        self.0.lock().unwrap().iter().rev().find(|l| l.row == row).cloned()
    }
}

impl DisplaySink for Screen {
    fn render(&mut self, line: &StatusLine) -> Result<(), DisplayError> {
        self.0.lock().unwrap().push(line.clone());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.0.lock().unwrap().clear();
        Ok(())
    }
}

// Wednesday 2026-10-21.
fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 21)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

struct Setup {
    activity: ActivityLoop,
    dispatcher: CommandDispatcher,
    nudges: Nudges,
    screen: Screen,
    clock: Arc<ManualClock>,
}

fn setup(config: &Config) -> Setup {
    let clock = Arc::new(ManualClock::new(start()));
    let shared_clock: Arc<dyn Clock> = clock.clone();
    let auto_pause = SharedAutoPause::new(AutoPauseController::new(
        config.duration_limits().unwrap(),
    ));
    let signals = LoopSignals::new();
    let nudges = Nudges::default();
    let screen = Screen::default();
    let mut timing = config.loop_timing().unwrap();
    timing.seed = Some(1);

    let activity = ActivityLoop::new(
        ScheduleEvaluator::new(config.work_hours().unwrap()),
        auto_pause.clone(),
        Box::new(nudges.clone()),
        Box::new(screen.clone()),
        Arc::clone(&shared_clock),
        Arc::clone(&signals),
        timing,
    );
    let dispatcher = CommandDispatcher::new(auto_pause, signals, shared_clock);
    Setup {
        activity,
        dispatcher,
        nudges,
        screen,
        clock,
    }
}

/// Advance the clock in 200 ms ticks for `total`, collecting events.
fn run_for(s: &mut Setup, total: Duration) -> Vec<Event> {
    let mut events = Vec::new();
    let step = Duration::milliseconds(200);
    let mut elapsed = Duration::zero();
    while elapsed < total {
        s.clock.advance(step);
        elapsed += step;
        events.extend(s.activity.tick(s.clock.now()).unwrap());
    }
    events
}

#[test]
fn test_preset_and_toggle_pause_after_the_hour() {
    let mut s = setup(&Config::default());
    s.activity.tick(start()).unwrap();

    s.dispatcher.handle(KeyInput::char('1'));
    s.dispatcher.handle(KeyInput::char('s'));

    let before = *s.nudges.0.lock().unwrap();
    run_for(&mut s, Duration::minutes(59));
    assert!(*s.nudges.0.lock().unwrap() > before);
    let line = s.screen.last(AUTO_PAUSE_ROW).unwrap();
    assert_eq!(line.tone, Tone::Warning);

    let events = run_for(&mut s, Duration::minutes(2));
    let paused = events.iter().rev().find_map(|e| match e {
        Event::UpdatePaused { decision, .. } => Some(*decision),
        _ => None,
    });
    assert_eq!(
        paused,
        Some(PauseDecision::PausedAutoPause {
            deadline: start() + Duration::hours(1)
        })
    );

    // No more nudges once paused.
    let after = *s.nudges.0.lock().unwrap();
    run_for(&mut s, Duration::minutes(1));
    assert_eq!(*s.nudges.0.lock().unwrap(), after);
}

#[test]
fn test_force_resume_pauses_on_next_tick() {
    let mut s = setup(&Config::default());
    s.activity.tick(start()).unwrap();
    s.dispatcher.handle(KeyInput::char('r'));

    let events = run_for(&mut s, Duration::seconds(1));
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::AutoPauseExpired { .. })));
    assert!(events.iter().any(|e| matches!(
        e,
        Event::UpdatePaused {
            decision: PauseDecision::PausedAutoPause { .. },
            ..
        }
    )));

    // Stopping the countdown resumes nudging.
    s.dispatcher.handle(KeyInput::char('s'));
    let before = *s.nudges.0.lock().unwrap();
    run_for(&mut s, Duration::seconds(3));
    assert!(*s.nudges.0.lock().unwrap() > before);
}

#[test]
fn test_never_config_has_blank_countdown() {
    let config = Config::from_toml("[auto_pause]\ndefault_minutes = 0\n").unwrap();
    let mut s = setup(&config);
    s.activity.tick(start()).unwrap();
    assert_eq!(s.screen.last(AUTO_PAUSE_ROW).unwrap().text.trim(), "");

    // Toggling does nothing until a duration is chosen.
    s.dispatcher.handle(KeyInput::char('s'));
    run_for(&mut s, Duration::seconds(1));
    assert!(s
        .screen
        .last(AUTO_PAUSE_ROW)
        .unwrap()
        .text
        .trim()
        .is_empty());

    for _ in 0..3 {
        s.dispatcher.handle(KeyInput::char('+'));
    }
    run_for(&mut s, Duration::milliseconds(200));
    assert!(s
        .screen
        .last(AUTO_PAUSE_ROW)
        .unwrap()
        .text
        .starts_with("AutoPause: 00h  45m   =>  NOT STARTED"));
}

#[test]
fn test_lunch_stops_nudging() {
    let mut s = setup(&Config::default());
    s.clock.set(start().date().and_hms_opt(11, 44, 50).unwrap());
    s.activity.tick(s.clock.now()).unwrap();
    let before = *s.nudges.0.lock().unwrap();
    assert_eq!(before, 1);

    let events = run_for(&mut s, Duration::seconds(30));
    assert!(events.iter().any(|e| matches!(
        e,
        Event::UpdatePaused {
            decision: PauseDecision::PausedLunch { .. },
            ..
        }
    )));
    // 11:44:50 .. 11:45:00 still nudges, nothing after.
    let after_lunch_start = *s.nudges.0.lock().unwrap();
    run_for(&mut s, Duration::seconds(30));
    assert_eq!(*s.nudges.0.lock().unwrap(), after_lunch_start);
}

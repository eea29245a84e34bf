//! Keyboard commands.
//!
//! Keys arrive from a [`KeySource`] as [`KeyInput`] values, are mapped to a
//! [`Command`], and applied to the shared auto-pause controller by the
//! [`CommandDispatcher`]. Screen requests go to the activity loop through
//! [`LoopSignals`].

use chrono::Duration;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::activity::LoopSignals;
use crate::clock::Clock;
use crate::error::Result;
use crate::events::Event;
use crate::timer::{AdjustStep, SharedAutoPause};

/// A key, independent of the terminal library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Esc,
    Other,
}

/// Modifier bitset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers(u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const SHIFT: Modifiers = Modifiers(1);
    pub const CTRL: Modifiers = Modifiers(1 << 1);
    pub const ALT: Modifiers = Modifiers(1 << 2);

    pub fn contains(self, other: Modifiers) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn any(self) -> bool {
        self.0 != 0
    }

    pub fn without(self, other: Modifiers) -> Modifiers {
        Modifiers(self.0 & !other.0)
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Modifiers) -> Modifiers {
        Modifiers(self.0 | rhs.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyInput {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn char(c: char) -> Self {
        Self::new(Key::Char(c), Modifiers::NONE)
    }
}

/// What a key asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ToggleAutoPause,
    ForceResume,
    Reset,
    Preset(Duration),
    Adjust { step: AdjustStep, increase: bool },
    ClearScreen,
    Quit,
}

impl Command {
    /// Map a key to a command. Unbound keys give `None`.
    ///
    /// Letters are case-insensitive. With any modifier held, digits `1`-`3`
    /// select 15/30/45 minutes and `+`/`-` step by one minute.
    pub fn from_key(input: KeyInput) -> Option<Command> {
        let modified = input.modifiers.any();
        let c = match input.key {
            Key::Esc => return Some(Command::Quit),
            Key::Other => return None,
            Key::Char(c) => c.to_ascii_lowercase(),
        };

        let step = if modified {
            AdjustStep::Fine
        } else {
            AdjustStep::Coarse
        };

        match c {
            's' => Some(Command::ToggleAutoPause),
            'r' => Some(Command::ForceResume),
            'c' => Some(Command::ClearScreen),
            'x' => Some(Command::Quit),
            '0' => Some(Command::Reset),
            '1'..='3' if modified => {
                let n = i64::from(c as u8 - b'0');
                Some(Command::Preset(Duration::minutes(15 * n)))
            }
            '1'..='9' => {
                let n = i64::from(c as u8 - b'0');
                Some(Command::Preset(Duration::hours(n)))
            }
            '+' => Some(Command::Adjust {
                step,
                increase: true,
            }),
            '-' => Some(Command::Adjust {
                step,
                increase: false,
            }),
            _ => None,
        }
    }
}

/// Whether the dispatcher keeps reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Source of key presses.
pub trait KeySource: Send {
    /// Wait up to `timeout` for the next key press.
    fn next_key(&mut self, timeout: std::time::Duration) -> Result<Option<KeyInput>>;
}

/// Applies commands to the shared controller.
pub struct CommandDispatcher {
    auto_pause: SharedAutoPause,
    signals: Arc<LoopSignals>,
    clock: Arc<dyn Clock>,
}

impl CommandDispatcher {
    pub fn new(auto_pause: SharedAutoPause, signals: Arc<LoopSignals>, clock: Arc<dyn Clock>) -> Self {
        Self {
            auto_pause,
            signals,
            clock,
        }
    }

    /// Handle one key press.
    pub fn handle(&self, input: KeyInput) -> Flow {
        let Some(command) = Command::from_key(input) else {
            tracing::trace!(?input, "unbound key");
            return Flow::Continue;
        };
        self.execute(command)
    }

    pub fn execute(&self, command: Command) -> Flow {
        let now = self.clock.now();
        let event = match command {
            Command::Quit => {
                tracing::info!("quit requested");
                return Flow::Quit;
            }
            Command::ClearScreen => {
                self.signals.request_clear();
                return Flow::Continue;
            }
            Command::ToggleAutoPause => self.auto_pause.lock().toggle_auto_pause(now),
            Command::ForceResume => self.auto_pause.lock().force_resume_now(now),
            Command::Reset => self.auto_pause.lock().reset(now),
            Command::Preset(d) => self.auto_pause.lock().set_configured_duration(d, now),
            Command::Adjust { step, increase } => {
                self.auto_pause.lock().adjust(step, increase, now)
            }
        };

        if let Some(event) = event.filter(Event::refreshes_status) {
            tracing::debug!(?event, "status refresh");
            self.signals.request_refresh();
        }
        Flow::Continue
    }
}

/// How long one poll of the key source may block.
pub const POLL_INTERVAL: std::time::Duration = std::time::Duration::from_millis(100);

/// Read keys until a quit key or cancellation.
///
/// Blocking; meant for `spawn_blocking`. Quitting cancels `cancel`.
pub fn run_dispatcher<S: KeySource + ?Sized>(
    source: &mut S,
    dispatcher: &CommandDispatcher,
    cancel: &CancellationToken,
) -> Result<()> {
    while !cancel.is_cancelled() {
        let Some(input) = source.next_key(POLL_INTERVAL)? else {
            continue;
        };
        if dispatcher.handle(input) == Flow::Quit {
            cancel.cancel();
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::schedule::{PauseDecision, ScheduleEvaluator};
    use crate::timer::{AutoPauseController, DurationLimits};
    use chrono::{NaiveDate, NaiveDateTime};
    use std::collections::VecDeque;

    fn t0() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 20)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    struct Fixture {
        dispatcher: CommandDispatcher,
        auto_pause: SharedAutoPause,
        clock: Arc<ManualClock>,
    }

    fn fixture_with(controller: AutoPauseController) -> Fixture {
        let auto_pause = SharedAutoPause::new(controller);
        let clock = Arc::new(ManualClock::new(t0()));
        let dispatcher =
            CommandDispatcher::new(auto_pause.clone(), LoopSignals::new(), clock.clone());
        Fixture {
            dispatcher,
            auto_pause,
            clock,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(AutoPauseController::default())
    }

    fn modified(c: char) -> KeyInput {
        KeyInput::new(Key::Char(c), Modifiers::CTRL)
    }

    struct ScriptedKeys(VecDeque<KeyInput>);

    impl KeySource for ScriptedKeys {
        fn next_key(&mut self, _timeout: std::time::Duration) -> Result<Option<KeyInput>> {
            Ok(self.0.pop_front())
        }
    }

    #[test]
    fn key_mapping() {
        assert_eq!(Command::from_key(KeyInput::char('S')), Some(Command::ToggleAutoPause));
        assert_eq!(Command::from_key(KeyInput::char('r')), Some(Command::ForceResume));
        assert_eq!(Command::from_key(KeyInput::char('0')), Some(Command::Reset));
        assert_eq!(
            Command::from_key(KeyInput::char('9')),
            Some(Command::Preset(Duration::hours(9)))
        );
        assert_eq!(
            Command::from_key(modified('2')),
            Some(Command::Preset(Duration::minutes(30)))
        );
        assert_eq!(
            Command::from_key(modified('5')),
            Some(Command::Preset(Duration::hours(5)))
        );
        assert_eq!(
            Command::from_key(KeyInput::new(Key::Esc, Modifiers::NONE)),
            Some(Command::Quit)
        );
        assert_eq!(Command::from_key(KeyInput::char('q')), None);
        assert_eq!(
            Command::from_key(KeyInput::new(Key::Other, Modifiers::ALT)),
            None
        );
    }

    #[test]
    fn modifiers_select_fine_step() {
        assert_eq!(
            Command::from_key(KeyInput::char('+')),
            Some(Command::Adjust {
                step: AdjustStep::Coarse,
                increase: true
            })
        );
        assert_eq!(
            Command::from_key(KeyInput::new(Key::Char('-'), Modifiers::ALT)),
            Some(Command::Adjust {
                step: AdjustStep::Fine,
                increase: false
            })
        );
    }

    #[test]
    fn modifier_bitset() {
        let m = Modifiers::SHIFT | Modifiers::CTRL;
        assert!(m.contains(Modifiers::CTRL));
        assert!(!m.contains(Modifiers::ALT));
        assert!(!m.without(Modifiers::SHIFT).contains(Modifiers::SHIFT));
        assert!(!Modifiers::NONE.any());
    }

    #[test]
    fn preset_one_hour_then_toggle_pauses_after_61_minutes() {
        let f = fixture();
        f.dispatcher.handle(KeyInput::char('1'));
        f.dispatcher.handle(KeyInput::char('s'));

        let eval = ScheduleEvaluator::default();
        let state = f.auto_pause.snapshot();
        assert_eq!(
            eval.evaluate(t0() + Duration::minutes(59), &state),
            PauseDecision::Active
        );
        assert_eq!(
            eval.evaluate(t0() + Duration::minutes(61), &state),
            PauseDecision::PausedAutoPause {
                deadline: t0() + Duration::hours(1)
            }
        );
    }

    #[test]
    fn force_resume_pauses_within_a_second() {
        let f = fixture();
        f.dispatcher.handle(KeyInput::char('r'));
        let eval = ScheduleEvaluator::default();
        assert!(matches!(
            eval.evaluate(t0() + Duration::seconds(1), &f.auto_pause.snapshot()),
            PauseDecision::PausedAutoPause { .. }
        ));
    }

    #[test]
    fn three_increments_from_never_give_45_minutes() {
        let f = fixture_with(AutoPauseController::new(DurationLimits {
            initial: None,
            ..DurationLimits::default()
        }));
        for _ in 0..3 {
            f.dispatcher.handle(KeyInput::char('+'));
        }
        assert_eq!(f.auto_pause.lock().configured(), Some(Duration::minutes(45)));
    }

    #[test]
    fn duration_change_restarts_armed_countdown() {
        let f = fixture();
        f.dispatcher.handle(KeyInput::char('s'));
        f.clock.advance(Duration::minutes(10));
        f.dispatcher.handle(modified('1'));
        let later = t0() + Duration::minutes(10);
        assert_eq!(
            f.auto_pause.lock().deadline(),
            Some(later + Duration::minutes(15))
        );
    }

    #[test]
    fn reset_returns_to_default() {
        let f = fixture();
        f.dispatcher.handle(KeyInput::char('5'));
        f.dispatcher.handle(KeyInput::char('s'));
        f.dispatcher.handle(KeyInput::char('0'));
        let state = f.auto_pause.snapshot();
        assert_eq!(state.configured, Some(Duration::minutes(30)));
        assert_eq!(state.deadline, None);
    }

    #[test]
    fn quit_key_stops_dispatcher_and_cancels() {
        let f = fixture();
        let cancel = CancellationToken::new();
        let mut keys = ScriptedKeys(
            [KeyInput::char('s'), KeyInput::char('x'), KeyInput::char('s')]
                .into_iter()
                .collect(),
        );
        run_dispatcher(&mut keys, &f.dispatcher, &cancel).unwrap();
        assert!(cancel.is_cancelled());
        // The key after quit is never read.
        assert_eq!(keys.0.len(), 1);
        assert!(f.auto_pause.snapshot().is_armed());
    }

    #[test]
    fn cancelled_token_stops_dispatcher() {
        let f = fixture();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let mut keys = ScriptedKeys([KeyInput::char('s')].into_iter().collect());
        run_dispatcher(&mut keys, &f.dispatcher, &cancel).unwrap();
        assert!(!f.auto_pause.snapshot().is_armed());
    }
}

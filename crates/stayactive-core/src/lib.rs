//! # StayActive Core Library
//!
//! This library keeps a workstation from going idle during work hours by
//! nudging the pointer a pixel or two every few seconds, and stops doing so
//! outside work hours or once a user-armed countdown runs out. The `stayactive`
//! CLI binary is a thin terminal front end over the same core.
//!
//! ## Architecture
//!
//! - **Schedule**: an ordered rule table that decides whether activity is
//!   paused at a given local instant (weekend, work hours, lunch, auto-pause)
//! - **Timer**: the auto-pause countdown, a wall-clock deadline shared between
//!   the activity loop and keyboard commands
//! - **Activity loop**: a tokio task with two cadences (update and display)
//!   driven by a single tick
//! - **Commands**: key presses mapped onto countdown mutations
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`ScheduleEvaluator`]: pure schedule decision
//! - [`AutoPauseController`]: countdown state machine
//! - [`ActivityLoop`]: the background worker
//! - [`CommandDispatcher`]: applies key commands
//! - [`Config`]: application configuration

pub mod activity;
pub mod clock;
pub mod command;
pub mod error;
pub mod events;
pub mod schedule;
pub mod storage;
pub mod timer;

pub use activity::{
    platform_nudger, ActivityLoop, DisplaySink, DryRunNudger, LoopSignals, LoopTiming,
    PointerNudger, StatusLine, TickSchedule, Tone,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use command::{run_dispatcher, Command, CommandDispatcher, Flow, Key, KeyInput, KeySource, Modifiers};
pub use error::{ConfigError, CoreError, DisplayError, NudgeError};
pub use events::Event;
pub use schedule::{PauseDecision, ScheduleEvaluator, WorkHours};
pub use storage::Config;
pub use timer::{AdjustStep, AutoPauseController, AutoPauseState, DurationLimits, SharedAutoPause};

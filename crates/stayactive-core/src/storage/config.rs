//! TOML-based application configuration.
//!
//! Holds the static settings the program runs with:
//! - Work hours, the short day, lunch and the weekend days
//! - Auto-pause default duration and its clamp bounds
//! - Tick, update and display cadences of the activity loop
//!
//! Configuration is read from `~/.config/stayactive/config.toml` when present.
//! The program never writes it back: runtime changes (such as the auto-pause
//! duration) live only as long as the process.

use chrono::{Duration, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::activity::LoopTiming;
use crate::error::ConfigError;
use crate::schedule::WorkHours;
use crate::timer::{DurationLimits, MAX_MINUTES, MIN_MINUTES};

/// Upper bound for any loop interval: one hour.
const MAX_INTERVAL_MS: u64 = 60 * 60 * 1000;

/// Work-hours configuration. Times are `HH:MM` in local time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkConfig {
    #[serde(default = "default_work_start")]
    pub start: String,
    #[serde(default = "default_work_end")]
    pub end: String,
    /// Day that ends early, if any.
    #[serde(default = "default_short_day")]
    pub short_day: Option<Weekday>,
    #[serde(default = "default_short_day_end")]
    pub short_day_end: String,
    #[serde(default = "default_lunch_start")]
    pub lunch_start: String,
    #[serde(default = "default_lunch_end")]
    pub lunch_end: String,
    #[serde(default = "default_weekend")]
    pub weekend: Vec<Weekday>,
}

/// Auto-pause configuration, in minutes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoPauseConfig {
    /// Duration the countdown starts with. `0` means "never".
    #[serde(default = "default_auto_pause_minutes")]
    pub default_minutes: u64,
    #[serde(default = "default_min_minutes")]
    pub min_minutes: u64,
    #[serde(default = "default_max_minutes")]
    pub max_minutes: u64,
}

/// Activity loop cadences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    #[serde(default = "default_update_ms")]
    pub update_ms: u64,
    #[serde(default = "default_display_ms")]
    pub display_ms: u64,
    /// Nudge offsets are drawn from `[-nudge_range, nudge_range)`.
    #[serde(default = "default_nudge_range")]
    pub nudge_range: i32,
    /// Fixed seed for the nudge generator (random when unset).
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Application configuration.
///
/// Deserialized from TOML at `~/.config/stayactive/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub work: WorkConfig,
    #[serde(default)]
    pub auto_pause: AutoPauseConfig,
    #[serde(default)]
    pub timing: TimingConfig,
}

// Default functions
fn default_work_start() -> String {
    "07:00".into()
}
fn default_work_end() -> String {
    "18:30".into()
}
fn default_short_day() -> Option<Weekday> {
    Some(Weekday::Fri)
}
fn default_short_day_end() -> String {
    "17:30".into()
}
fn default_lunch_start() -> String {
    "11:45".into()
}
fn default_lunch_end() -> String {
    "12:30".into()
}
fn default_weekend() -> Vec<Weekday> {
    vec![Weekday::Sat, Weekday::Sun]
}
fn default_auto_pause_minutes() -> u64 {
    30
}
fn default_min_minutes() -> u64 {
    1
}
fn default_max_minutes() -> u64 {
    12 * 60
}
fn default_tick_ms() -> u64 {
    200
}
fn default_update_ms() -> u64 {
    2000
}
fn default_display_ms() -> u64 {
    500
}
fn default_nudge_range() -> i32 {
    2
}

impl Default for WorkConfig {
    fn default() -> Self {
        Self {
            start: default_work_start(),
            end: default_work_end(),
            short_day: default_short_day(),
            short_day_end: default_short_day_end(),
            lunch_start: default_lunch_start(),
            lunch_end: default_lunch_end(),
            weekend: default_weekend(),
        }
    }
}

impl Default for AutoPauseConfig {
    fn default() -> Self {
        Self {
            default_minutes: default_auto_pause_minutes(),
            min_minutes: default_min_minutes(),
            max_minutes: default_max_minutes(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            update_ms: default_update_ms(),
            display_ms: default_display_ms(),
            nudge_range: default_nudge_range(),
            seed: None,
        }
    }
}

fn parse_hhmm(key: &str, value: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|e| ConfigError::invalid(key, format!("'{value}' is not HH:MM ({e})")))
}

fn positive_ms(key: &str, value: u64) -> Result<i64, ConfigError> {
    if value == 0 {
        return Err(ConfigError::invalid(key, "must be greater than zero"));
    }
    if value > MAX_INTERVAL_MS {
        return Err(ConfigError::invalid(
            key,
            format!("must be at most {MAX_INTERVAL_MS} ms"),
        ));
    }
    i64::try_from(value).map_err(|_| ConfigError::invalid(key, "out of range"))
}

fn bounded_minutes(key: &str, value: u64) -> Result<Duration, ConfigError> {
    let minutes = i64::try_from(value).unwrap_or(i64::MAX);
    if !(MIN_MINUTES..=MAX_MINUTES).contains(&minutes) {
        return Err(ConfigError::invalid(
            key,
            format!("must be between {MIN_MINUTES} and {MAX_MINUTES} minutes"),
        ));
    }
    Ok(Duration::minutes(minutes))
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    /// Default location of the config file.
    pub fn default_path() -> PathBuf {
        data_dir().join("config.toml")
    }

    /// Load from `path` (or the default location), falling back to defaults
    /// when the file does not exist. The loaded config is validated.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// if any value fails validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::default_path);
        let cfg = match std::fs::read_to_string(&path) {
            Ok(content) => Self::from_toml(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Self::default()
            }
            Err(e) => {
                return Err(ConfigError::LoadFailed {
                    path,
                    message: e.to_string(),
                })
            }
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a TOML document. Does not validate.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Check every value that cannot be expressed in the types alone.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.work_hours()?;
        self.duration_limits()?;
        self.loop_timing()?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Work hours parsed into the evaluator's representation.
    pub fn work_hours(&self) -> Result<WorkHours, ConfigError> {
        let w = &self.work;
        let start = parse_hhmm("work.start", &w.start)?;
        let end = parse_hhmm("work.end", &w.end)?;
        if start >= end {
            return Err(ConfigError::invalid("work.end", "must be after work.start"));
        }

        let short_day = match w.short_day {
            Some(day) => {
                let short_end = parse_hhmm("work.short_day_end", &w.short_day_end)?;
                if short_end <= start {
                    return Err(ConfigError::invalid(
                        "work.short_day_end",
                        "must be after work.start",
                    ));
                }
                Some((day, short_end))
            }
            None => None,
        };

        let lunch_start = parse_hhmm("work.lunch_start", &w.lunch_start)?;
        let lunch_end = parse_hhmm("work.lunch_end", &w.lunch_end)?;
        if lunch_start >= lunch_end {
            return Err(ConfigError::invalid(
                "work.lunch_end",
                "must be after work.lunch_start",
            ));
        }

        Ok(WorkHours {
            start,
            end,
            short_day,
            lunch: (lunch_start, lunch_end),
            weekend: w.weekend.clone(),
        })
    }

    /// Auto-pause duration bounds and starting value.
    ///
    /// Every bound must lie in `[MIN_MINUTES, MAX_MINUTES]`, so no duration
    /// the controller produces can leave that range.
    pub fn duration_limits(&self) -> Result<DurationLimits, ConfigError> {
        let a = &self.auto_pause;
        let min = bounded_minutes("auto_pause.min_minutes", a.min_minutes)?;
        let max = bounded_minutes("auto_pause.max_minutes", a.max_minutes)?;
        if min > max {
            return Err(ConfigError::invalid(
                "auto_pause.max_minutes",
                "must not be below auto_pause.min_minutes",
            ));
        }

        let initial = match a.default_minutes {
            0 => None,
            minutes => Some(bounded_minutes("auto_pause.default_minutes", minutes)?),
        };

        Ok(DurationLimits { min, max, initial })
    }

    /// Loop cadences and nudge parameters.
    pub fn loop_timing(&self) -> Result<LoopTiming, ConfigError> {
        let t = &self.timing;
        let tick_ms = positive_ms("timing.tick_ms", t.tick_ms)?.unsigned_abs();
        let update_ms = positive_ms("timing.update_ms", t.update_ms)?;
        let display_ms = positive_ms("timing.display_ms", t.display_ms)?;
        if t.nudge_range <= 0 {
            return Err(ConfigError::invalid(
                "timing.nudge_range",
                "must be greater than zero",
            ));
        }

        Ok(LoopTiming {
            tick: std::time::Duration::from_millis(tick_ms),
            update: Duration::milliseconds(update_ms),
            display: Duration::milliseconds(display_ms),
            nudge_range: t.nudge_range,
            seed: t.seed,
        })
    }
}

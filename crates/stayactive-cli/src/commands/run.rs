use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use stayactive_core::{
    platform_nudger, run_dispatcher, ActivityLoop, AutoPauseController, Clock, CommandDispatcher,
    Config, LoopSignals, ScheduleEvaluator, SharedAutoPause, SystemClock,
};

use super::terminal::{CrosstermKeys, TerminalDisplay, TerminalGuard};
use crate::logging;

/// How long shutdown waits for the activity loop.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

#[derive(Args, Default)]
pub struct RunArgs {
    /// Config file (defaults to ~/.config/stayactive/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Log nudges instead of moving the pointer
    #[arg(long)]
    pub dry_run: bool,
    /// Write logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    match &args.log_file {
        Some(path) => logging::init_file(path)?,
        None => logging::init_stderr(),
    }

    let config = Config::load(args.config.as_deref())?;
    let evaluator = ScheduleEvaluator::new(config.work_hours()?);
    let auto_pause = SharedAutoPause::new(AutoPauseController::new(config.duration_limits()?));
    let timing = config.loop_timing()?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let signals = LoopSignals::new();
    let cancel = CancellationToken::new();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let guard = TerminalGuard::enter()?;

    let activity = ActivityLoop::new(
        evaluator,
        auto_pause.clone(),
        platform_nudger(args.dry_run),
        Box::new(TerminalDisplay::new()),
        Arc::clone(&clock),
        Arc::clone(&signals),
        timing,
    );
    let dispatcher = CommandDispatcher::new(auto_pause, signals, clock);

    let outcome = runtime.block_on(async {
        let worker = tokio::spawn(activity.run(cancel.clone()));

        let input_cancel = cancel.clone();
        let input = tokio::task::spawn_blocking(move || {
            let mut keys = CrosstermKeys;
            let result = run_dispatcher(&mut keys, &dispatcher, &input_cancel);
            // A broken input source still has to stop the loop.
            input_cancel.cancel();
            result
        });
        let input_result = input.await;

        print_line(0, "waiting for the background task to complete");
        let worker_result = tokio::time::timeout(SHUTDOWN_GRACE, worker).await;
        print_line(1, "completed");
        (input_result, worker_result)
    });

    drop(guard);
    println!();
    runtime.shutdown_timeout(Duration::from_millis(100));

    let (input_result, worker_result) = outcome;
    match worker_result {
        Ok(joined) => joined??,
        Err(_) => {
            tracing::warn!("activity loop did not stop within {SHUTDOWN_GRACE:?}");
        }
    }
    input_result??;
    Ok(())
}

/// Print `offset` rows below the legend, in raw mode.
fn print_line(offset: u16, text: &str) {
    use crossterm::{cursor, execute, style::Print};
    let _ = execute!(
        std::io::stdout(),
        cursor::MoveTo(0, stayactive_core::activity::LEGEND_ROW + 2 + offset),
        Print(text)
    );
}

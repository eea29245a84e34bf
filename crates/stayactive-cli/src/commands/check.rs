use chrono::NaiveDateTime;
use clap::Args;
use std::path::PathBuf;

use stayactive_core::{AutoPauseState, Clock, Config, ScheduleEvaluator, SystemClock};

#[derive(Args)]
pub struct CheckArgs {
    /// Local time to evaluate, "YYYY-MM-DD HH:MM" (defaults to now)
    #[arg(long, value_parser = parse_at)]
    pub at: Option<NaiveDateTime>,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
    /// Config file (defaults to ~/.config/stayactive/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

fn parse_at(s: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M")
        .map_err(|e| format!("expected \"YYYY-MM-DD HH:MM\": {e}"))
}

/// Evaluate with the countdown unarmed: nothing is persisted between runs.
pub fn run(args: CheckArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load(args.config.as_deref())?;
    let evaluator = ScheduleEvaluator::new(config.work_hours()?);
    let at = args.at.unwrap_or_else(|| SystemClock.now());

    let (rule, decision) = evaluator.evaluate_with_rule(at, &AutoPauseState::default());

    if args.json {
        let out = serde_json::json!({
            "at": at,
            "rule": rule,
            "paused": decision.is_paused(),
            "decision": decision,
            "reason": decision.to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", decision);
        println!("Rule: {rule}");
        println!("At:   {}", at.format("%Y-%m-%d %H:%M (%a)"));
    }
    Ok(())
}

const BINDINGS: &[(&str, &str)] = &[
    ("s", "start/stop the auto-pause countdown"),
    ("r", "pause now (30 min duration, already expired)"),
    ("0", "reset the duration to its default and stop the countdown"),
    ("1-9", "set the duration to 1-9 hours"),
    ("Alt/Ctrl+1-3", "set the duration to 15/30/45 minutes"),
    ("+ / -", "adjust the duration by 15 minutes"),
    ("Alt/Ctrl + / -", "adjust the duration by 1 minute"),
    ("c", "clear and redraw the screen"),
    ("x, Esc, Ctrl+C", "quit"),
];

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    for (key, effect) in BINDINGS {
        println!("  {key:<16} {effect}");
    }
    Ok(())
}

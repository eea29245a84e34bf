use clap::{Parser, Subcommand};

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "stayactive", version, about = "Keep the workstation awake during work hours")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive activity loop (default)
    Run(commands::run::RunArgs),
    /// Evaluate the work schedule once
    Check(commands::check::CheckArgs),
    /// Configuration inspection
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print the key bindings
    Keys,
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        None => commands::run::run(commands::run::RunArgs::default()),
        Some(Commands::Run(args)) => commands::run::run(args),
        Some(Commands::Check(args)) => commands::check::run(args),
        Some(Commands::Config { action }) => commands::config::run(action),
        Some(Commands::Keys) => commands::keys::run(),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

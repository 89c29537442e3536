use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "webtime-cli", version, about = "Webtime CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a recorded host event log through the engine
    Replay {
        /// Path to a JSON file holding the event log
        file: std::path::PathBuf,
    },
    /// Usage statistics
    Stats,
    /// Raw per-domain data
    Data,
    /// Goal management
    Goal {
        #[command(subcommand)]
        action: commands::goal::GoalAction,
    },
    /// Tracking control
    Tracking {
        #[command(subcommand)]
        action: commands::tracking::TrackingAction,
    },
    /// Clear all tracked data
    Reset,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Replay { file } => commands::replay::run(&file),
        Commands::Stats => commands::stats::run(),
        Commands::Data => commands::data::run(),
        Commands::Goal { action } => commands::goal::run(action),
        Commands::Tracking { action } => commands::tracking::run(action),
        Commands::Reset => commands::reset::run(),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

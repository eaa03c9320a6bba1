use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod driver;
mod headless;
mod notify;
mod terminal;

#[derive(Parser)]
#[command(
    name = "pomotimer",
    version,
    about = "Pomodoro interval timer",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    run: commands::run::RunArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the timer (default)
    Run(commands::run::RunArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let result = match cli.command {
        Some(Commands::Run(args)) => commands::run::run(args),
        Some(Commands::Config { action }) => commands::config::run(action),
        None => commands::run::run(cli.run),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "pomotask", version, about = "Pomodoro focus timer and task list")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run or inspect the focus/break timer
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Timer durations and cycle length
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Task list management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Remote account
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
    /// Task synchronization with the remote account
    Sync {
        #[command(subcommand)]
        action: commands::sync::SyncAction,
    },
    /// Light/dark theme preference
    Theme {
        #[command(subcommand)]
        action: commands::theme::ThemeAction,
    },
    /// Experience points and level
    Xp {
        #[command(subcommand)]
        action: commands::xp::XpAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("POMOTASK_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_tracing();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Timer { action } => commands::timer::run(action).await,
        Commands::Settings { action } => commands::settings::run(action).await,
        Commands::Task { action } => commands::task::run(action).await,
        Commands::Auth { action } => commands::auth::run(action).await,
        Commands::Sync { action } => commands::sync::run(action).await,
        Commands::Theme { action } => commands::theme::run(action),
        Commands::Xp { action } => commands::xp::run(action),
        Commands::Config { action } => commands::config::run(action).await,
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

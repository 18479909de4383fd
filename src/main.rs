//! game2048 - terminal 2048 with saved games and a local leaderboard.

use anyhow::Result;
use clap::Parser;
use tracing::{info, instrument};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use game2048::{
    AppConfig, Cli, CliCommand, GameRepository, LeaderboardService, SnapshotStore, run_tui,
};

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    match cli.command.unwrap_or(CliCommand::Play) {
        CliCommand::Play => run_tui(&config),
        CliCommand::Scores => {
            initialize_cli_tracing();
            print_scores(&config)
        }
        CliCommand::Reset => {
            initialize_cli_tracing();
            reset_saved_game(&config)
        }
    }
}

/// Layers config file, environment and flags, later ones winning.
fn resolve_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    let db_path = cli
        .db_path
        .clone()
        .or_else(|| std::env::var("GAME2048_DB").ok());
    if let Some(db_path) = db_path {
        config = config.with_db_path(db_path);
    }
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    Ok(config)
}

#[instrument(skip(config))]
fn print_scores(config: &AppConfig) -> Result<()> {
    let repository = GameRepository::new(config.db_path().clone())?;
    let board = LeaderboardService::new(repository).load()?;

    if board.is_empty() {
        println!("No scores yet.");
        return Ok(());
    }

    println!("{:>3}  {:<20} {:>8}  {}", "#", "Name", "Score", "Date");
    for (index, entry) in board.entries().iter().enumerate() {
        println!(
            "{:>3}  {:<20} {:>8}  {}",
            index + 1,
            entry.name(),
            entry.score(),
            entry.date_label()
        );
    }
    Ok(())
}

#[instrument(skip(config))]
fn reset_saved_game(config: &AppConfig) -> Result<()> {
    let repository = GameRepository::new(config.db_path().clone())?;
    if SnapshotStore::new(repository).reset()? {
        println!("Saved game discarded.");
    } else {
        println!("No saved game.");
    }
    Ok(())
}

#[instrument]
fn initialize_cli_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn,game2048=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("CLI tracing initialized");
}

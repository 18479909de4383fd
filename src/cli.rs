//! Command-line interface for game2048.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// 2048 - sliding-tile puzzle for the terminal
#[derive(Parser, Debug)]
#[command(name = "game2048")]
#[command(about = "Play 2048 in the terminal with saved games and a local leaderboard", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file (defaults to ./game2048.toml if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Path to the database file (created if it doesn't exist; falls back to $GAME2048_DB)
    #[arg(long)]
    pub db_path: Option<String>,

    /// Fixed RNG seed for a reproducible game
    #[arg(long)]
    pub seed: Option<u64>,

    /// Subcommand to run (defaults to `play`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Play in the terminal UI
    Play,

    /// Print the leaderboard
    Scores,

    /// Discard the saved game
    Reset,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_no_subcommand() {
        let cli = Cli::try_parse_from(["game2048"]).expect("parse");
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_global_flags_and_subcommand() {
        let cli = Cli::try_parse_from(["game2048", "--db-path", "x.db", "--seed", "4", "scores"])
            .expect("parse");
        assert_eq!(cli.db_path.as_deref(), Some("x.db"));
        assert_eq!(cli.seed, Some(4));
        assert_eq!(cli.command, Some(Command::Scores));
    }

    #[test]
    fn test_unknown_subcommand_rejected() {
        assert!(Cli::try_parse_from(["game2048", "fly"]).is_err());
    }
}

//! Command-line interface for tictac.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Tictac - two-player tic-tac-toe with a game store
#[derive(Parser, Debug)]
#[command(name = "tictac")]
#[command(about = "Play tic-tac-toe in the terminal and keep score on a server", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the game store HTTP API
    Serve {
        /// TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Host to bind to (overrides config and HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides config and PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// SQLite database path (overrides config and DATABASE_URL)
        #[arg(long)]
        database_url: Option<String>,

        /// Comma-separated browser origins (overrides config and ALLOWED_ORIGINS)
        #[arg(long)]
        allowed_origins: Option<String>,
    },

    /// Play rounds in the terminal, recording each one on the server
    Play {
        /// Game store URL
        #[arg(long, default_value = "http://localhost:4000")]
        server_url: String,

        /// Resume an existing game instead of creating one
        #[arg(short, long)]
        game: Option<String>,

        /// First player (plays X)
        #[arg(long, required_unless_present = "game")]
        player1: Option<String>,

        /// Second player (plays O)
        #[arg(long, required_unless_present = "game")]
        player2: Option<String>,
    },

    /// List recorded games, newest first
    List {
        /// Game store URL
        #[arg(long, default_value = "http://localhost:4000")]
        server_url: String,
    },

    /// Show one game with its rounds
    Show {
        /// Game id
        id: String,

        /// Game store URL
        #[arg(long, default_value = "http://localhost:4000")]
        server_url: String,
    },

    /// Stop a game so no more rounds can be recorded
    Stop {
        /// Game id
        id: String,

        /// Game store URL
        #[arg(long, default_value = "http://localhost:4000")]
        server_url: String,
    },
}

//! Command-line interface for tictactoe_arena.

use clap::{Parser, Subcommand};
use tictactoe_arena::Mark;

/// Tic-tac-toe arena - minimax opponent and match server
#[derive(Parser, Debug)]
#[command(name = "tictactoe_arena")]
#[command(about = "Tic-tac-toe against a perfect opponent, locally or over HTTP", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Http {
        /// Port to bind to (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Path to server config file
        #[arg(short, long, default_value = "server.toml")]
        config: std::path::PathBuf,
    },

    /// Play against the computer in this terminal
    Play {
        /// Your mark (X or O)
        #[arg(short, long, default_value = "X")]
        mark: Mark,

        /// Mark that moves first (X or O)
        #[arg(short, long, default_value = "X")]
        start: Mark,
    },

    /// Watch the computer play itself
    Selfplay {
        /// Mark that moves first (X or O)
        #[arg(short, long, default_value = "X")]
        start: Mark,
    },
}

//! Tic-tac-toe arena - unified CLI

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use std::path::PathBuf;
use tictactoe_arena::{Mark, ServerConfig};
use tracing::{info, instrument};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    initialize_tracing();

    match cli.command {
        Command::Http { port, host, config } => run_http_server(config, host, port).await,
        Command::Play { mark, start } => run_terminal(mark, start),
        Command::Selfplay { start } => run_self_play(start),
    }
}

fn initialize_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,tictactoe_arena=debug".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Run the HTTP game server
#[instrument(skip_all, fields(config_path = %config_path.display()))]
async fn run_http_server(config_path: PathBuf, host: Option<String>, port: Option<u16>) -> Result<()> {
    let config = ServerConfig::load_or_default(&config_path)?.with_overrides(host, port);
    info!(host = %config.host(), port = config.port(), "Starting tic-tac-toe server");
    tictactoe_arena::serve(&config).await?;
    Ok(())
}

/// Play in this terminal
fn run_terminal(mark: Mark, start: Mark) -> Result<()> {
    let stdin = std::io::stdin();
    tictactoe_arena::play(mark, start, stdin.lock(), std::io::stdout())?;
    Ok(())
}

/// Computer against itself
fn run_self_play(start: Mark) -> Result<()> {
    let game = tictactoe_arena::self_play(start)?;
    println!("{}\n", game.board().display());
    match game.winner() {
        Some(outcome) if outcome.is_draw() => println!("Draw after {} moves", game.history().len()),
        Some(outcome) => println!("{} wins after {} moves", outcome, game.history().len()),
        None => println!("Unfinished"),
    }
    Ok(())
}

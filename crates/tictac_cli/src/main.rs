//! Tictac - unified CLI
//!
//! Runs the game store server, plays rounds in the terminal, and inspects
//! recorded games.

#![warn(missing_docs)]

mod api_client;
mod cli;
mod play;

use anyhow::Result;
use api_client::ApiClient;
use clap::Parser;
use cli::{Cli, Command};
use tictac_server::{Game, ServerConfig, parse_origins};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            config,
            host,
            port,
            database_url,
            allowed_origins,
        } => {
            let mut config = ServerConfig::load(config.as_deref())?;
            if let Some(host) = host {
                config = config.with_host(host);
            }
            if let Some(port) = port {
                config = config.with_port(port);
            }
            if let Some(database_url) = database_url {
                config = config.with_database_url(database_url);
            }
            if let Some(origins) = allowed_origins {
                config = config.with_allowed_origins(parse_origins(&origins));
            }
            run_server(config).await
        }
        Command::Play {
            server_url,
            game,
            player1,
            player2,
        } => play::run(&ApiClient::new(server_url), game, player1, player2).await,
        Command::List { server_url } => list_games(&ApiClient::new(server_url)).await,
        Command::Show { id, server_url } => show_game(&ApiClient::new(server_url), &id).await,
        Command::Stop { id, server_url } => {
            let game = ApiClient::new(server_url).stop_game(&id).await?;
            println!("Game {} is {}", game.id, game.status);
            Ok(())
        }
    }
}

/// Run the game store HTTP API
#[instrument(skip_all)]
async fn run_server(config: ServerConfig) -> Result<()> {
    info!(
        host = %config.host(),
        port = config.port(),
        database_url = %config.database_url(),
        "Starting game store"
    );
    tictac_server::serve(config).await
}

fn summary(game: &Game) -> String {
    let tally = game.tally();
    format!(
        "{}  {} vs {}  [{}]  {}-{} ({} drawn)",
        game.id, game.player1, game.player2, game.status, tally.player1, tally.player2, tally.draws
    )
}

/// Print every game, newest first
async fn list_games(client: &ApiClient) -> Result<()> {
    let games = client.list_games().await?;
    if games.is_empty() {
        println!("No games recorded.");
    }
    for game in &games {
        println!("{}", summary(game));
    }
    Ok(())
}

/// Print one game with its rounds
async fn show_game(client: &ApiClient, id: &str) -> Result<()> {
    let game = client.get_game(id).await?;
    println!("{}", summary(&game));
    println!("Created {}", game.created_at.format("%Y-%m-%d %H:%M:%S"));
    for (number, round) in game.rounds.iter().enumerate() {
        println!("  Round {}: {}", number + 1, round.winner);
        for row in round.board.rows() {
            let cells: Vec<&str> = row
                .iter()
                .map(|cell| match cell.as_str() {
                    "" => ".",
                    mark => mark,
                })
                .collect();
            println!("    {}", cells.join(" "));
        }
    }
    Ok(())
}

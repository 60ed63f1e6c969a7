//! Terminal play loop.
//!
//! Rounds are played locally on a [`RoundEngine`]; each finished round is
//! submitted to the game store, after which the players either continue or
//! stop the game.

use std::time::Duration;

use anyhow::{Result, bail};
use tictac_engine::{Difficulty, Mark, MoveError, Outcome, RoundEngine};
use tictac_server::Game;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing::{debug, info, instrument, warn};

use crate::api_client::ApiClient;

/// One line typed during a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// Board cell, already converted to a 0-based index.
    Cell(usize),
    /// Difficulty change (`e`, `m`, `h`).
    Difficulty(Difficulty),
    /// Leave without recording the round.
    Quit,
    /// Anything else.
    Unknown,
}

/// Parses a round input line.
pub fn parse_input(line: &str) -> Input {
    let line = line.trim().to_ascii_lowercase();
    match line.as_str() {
        "e" | "easy" => Input::Difficulty(Difficulty::Easy),
        "m" | "medium" => Input::Difficulty(Difficulty::Medium),
        "h" | "hard" => Input::Difficulty(Difficulty::Hard),
        "q" | "quit" => Input::Quit,
        other => match other.parse::<usize>() {
            Ok(n @ 1..=9) => Input::Cell(n - 1),
            _ => Input::Unknown,
        },
    }
}

/// Parses the answer to "play another round?". Anything but no means yes.
pub fn wants_another_round(line: &str) -> bool {
    !matches!(line.trim().to_ascii_lowercase().as_str(), "n" | "no" | "s" | "stop")
}

fn player_name(game: &Game, mark: Mark) -> &str {
    match mark {
        Mark::X => &game.player1,
        Mark::O => &game.player2,
    }
}

fn describe(game: &Game, outcome: Outcome) -> String {
    match outcome {
        Outcome::Won(mark) => format!("{} ({}) wins the round!", player_name(game, mark), mark),
        Outcome::Draw => "Round drawn.".to_string(),
    }
}

fn print_scoreboard(game: &Game) {
    let tally = game.tally();
    println!(
        "\n{} (X) {} - {} {} (O), {} drawn",
        game.player1, tally.player1, tally.player2, game.player2, tally.draws
    );
}

fn print_turn(engine: &RoundEngine, game: &Game) {
    println!("\n{}\n", engine.board().display());
    let clock = match engine.difficulty() {
        Some(difficulty) => format!(" [{}: {}s]", difficulty, engine.time_left()),
        None => String::new(),
    };
    println!(
        "{} ({}) to move{}. Cell 1-9, e/m/h for difficulty, q to quit:",
        player_name(game, engine.to_move()),
        engine.to_move(),
        clock
    );
}

/// Clears the board for the next round and mirrors the game's status onto
/// the engine. Returns `false` once the game is stopped.
pub fn prepare_next_round(engine: &mut RoundEngine, game: &Game) -> bool {
    engine.reset();
    engine.set_game_status(game.status);
    game.status.is_active()
}

/// Plays one round until it ends or input runs out.
///
/// Returns `None` if the players quit or input closed before the round
/// finished.
#[instrument(skip_all, fields(game_id = %game.id))]
pub async fn play_round<R>(
    engine: &mut RoundEngine,
    lines: &mut Lines<R>,
    game: &Game,
) -> Result<Option<Outcome>>
where
    R: AsyncBufRead + Unpin,
{
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.tick().await;
    print_turn(engine, game);

    loop {
        let counting = engine.is_counting_down();
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("Input closed");
                    return Ok(None);
                };
                match parse_input(&line) {
                    Input::Cell(index) => match engine.apply_move(index) {
                        Ok(Some(outcome)) => {
                            println!("\n{}", engine.board().display());
                            return Ok(Some(outcome));
                        }
                        Ok(None) => {
                            ticker.reset();
                            print_turn(engine, game);
                        }
                        Err(MoveError::SquareOccupied(_)) => {
                            println!("Cell {} is taken.", index + 1);
                        }
                        Err(e) => {
                            warn!(error = %e, "Move refused");
                            println!("{}", e);
                        }
                    },
                    Input::Difficulty(difficulty) => {
                        engine.select_difficulty(difficulty)?;
                        ticker.reset();
                        println!("Difficulty {}: {}s per move.", difficulty, difficulty.time_limit());
                    }
                    Input::Quit => return Ok(None),
                    Input::Unknown => println!("Enter a cell 1-9, e/m/h, or q."),
                }
            }
            _ = ticker.tick(), if counting => {
                if let Some(outcome) = engine.tick() {
                    println!("\nTime is up!");
                    return Ok(Some(outcome));
                }
                let left = engine.time_left();
                if left <= 5 || left % 10 == 0 {
                    println!("{}s left", left);
                }
            }
        }
    }
}

/// Runs the interactive session against the server.
///
/// Creates a game for the two players, or resumes `game_id`.
///
/// # Errors
///
/// Fails on network or server errors, or when resuming a stopped game.
#[instrument(skip(client), fields(server = %client.base_url()))]
pub async fn run(
    client: &ApiClient,
    game_id: Option<String>,
    player1: Option<String>,
    player2: Option<String>,
) -> Result<()> {
    if !client.health().await? {
        bail!("Game store at {} is not healthy", client.base_url());
    }

    let mut game = match game_id {
        Some(id) => match client.get_game(&id).await {
            Err(e) if e.status() == Some(404) => bail!("No game with id {}", id),
            other => other?,
        },
        None => {
            let player1 = player1.unwrap_or_default();
            let player2 = player2.unwrap_or_default();
            client.create_game(&player1, &player2).await?
        }
    };
    if !game.status.is_active() {
        bail!("Game {} is stopped", game.id);
    }
    info!(game_id = %game.id, rounds = game.rounds.len(), "Playing");
    println!("Game {}: {} (X) vs {} (O)", game.id, game.player1, game.player2);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut engine = RoundEngine::new();
    engine.set_game_status(game.status);
    let mut difficulty = None;

    loop {
        print_scoreboard(&game);
        if let Some(level) = difficulty {
            engine.select_difficulty(level)?;
        }

        let Some(outcome) = play_round(&mut engine, &mut lines, &game).await? else {
            println!("Leaving without recording the round.");
            return Ok(());
        };
        difficulty = engine.difficulty();
        println!("{}", describe(&game, outcome));

        game = client
            .append_round(&game.id, outcome.into(), engine.snapshot())
            .await?;
        print_scoreboard(&game);

        println!("Play another round? [Y/n]");
        let answer = lines.next_line().await?.unwrap_or_default();
        if !wants_another_round(&answer) {
            let game = client.stop_game(&game.id).await?;
            println!("Game {} stopped after {} rounds.", game.id, game.rounds.len());
            return Ok(());
        }

        game = client.get_game(&game.id).await?;
        if !prepare_next_round(&mut engine, &game) {
            println!("Game {} was stopped elsewhere; no more rounds.", game.id);
            return Ok(());
        }
    }
}

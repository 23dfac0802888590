//! Line-based terminal play against the computer.

use crate::games::tictactoe::{Board, Mark, Match, MoveError, Outcome, Position};
use anyhow::{Result, bail};
use std::io::{BufRead, Write};
use tracing::{debug, info, instrument};

/// Reads a move typed at the prompt.
///
/// Accepts the 1-based cell number printed on the board, or a label such
/// as "center" or "top left".
pub fn parse_move(input: &str) -> Option<usize> {
    let input = input.trim();
    if let Ok(number) = input.parse::<usize>() {
        return number.checked_sub(1).filter(|index| *index < Board::SIZE);
    }
    Position::from_label_or_number(input).map(Position::to_index)
}

fn describe(outcome: Outcome, human: Mark) -> &'static str {
    match outcome {
        Outcome::Draw => "It's a draw.",
        Outcome::Won(mark) if mark == human => "You win!",
        Outcome::Won(_) => "The computer wins.",
    }
}

/// Plays one game, reading human moves from `input`.
///
/// Returns the outcome, or an error if `input` runs dry first.
#[instrument(skip(input, output))]
pub fn play<R: BufRead, W: Write>(human: Mark, start: Mark, mut input: R, mut output: W) -> Result<Outcome> {
    let mut game = Match::computer(human, start);
    writeln!(output, "You are {}. Enter 1-9 or a cell name.", human)?;

    let outcome = loop {
        if let Some(outcome) = game.winner() {
            break outcome;
        }

        if game.is_computer_turn() {
            let index = game.apply_computer_move()?;
            let label = Position::from_index(index).map_or("?", |pos| pos.label());
            writeln!(output, "Computer plays {}.", label)?;
            continue;
        }

        let open: Vec<_> = Position::valid_moves(game.board()).iter().map(|pos| pos.label()).collect();
        writeln!(output, "\n{}\n\nOpen: {}", game.board().display(), open.join(", "))?;
        write!(output, "Your move: ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            bail!("Input closed before the game finished");
        }

        let Some(index) = parse_move(&line) else {
            writeln!(output, "Unrecognized cell: {}", line.trim())?;
            continue;
        };
        match game.apply_human_move(index, human) {
            Ok(_) => debug!(index, "Human move accepted"),
            Err(err @ MoveError::CellOccupied(_)) => writeln!(output, "{}", err)?,
            Err(err) => return Err(err.into()),
        }
    };

    writeln!(output, "\n{}\n\n{}", game.board().display(), describe(outcome, human))?;
    info!(%outcome, "Terminal game finished");
    Ok(outcome)
}

/// Lets the search play both marks and returns the finished match.
#[instrument]
pub fn self_play(start: Mark) -> Result<Match> {
    let mut game = Match::two_player(start);
    while !game.is_terminal() {
        let mark = game.to_move();
        let index = crate::games::tictactoe::find_best_move(game.board(), mark, mark.opponent())?;
        game.apply_human_move(index, mark)?;
    }
    Ok(game)
}

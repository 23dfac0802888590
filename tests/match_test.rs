//! Tests for the match controller.

use tictactoe_arena::{Cell, GameMode, Mark, Match, MoveError, Outcome};

fn play_all(game: &mut Match, moves: &[usize]) {
    for &index in moves {
        let mark = game.to_move();
        game.apply_human_move(index, mark).expect("legal move");
    }
}

#[test]
fn test_human_center_then_computer_corner() {
    let mut game = Match::new(GameMode::Computer, Mark::X, Some(Mark::X));

    let outcome = game.apply_human_move(4, Mark::X).expect("center is legal");
    assert_eq!(outcome, None);
    assert_eq!(
        serde_json::to_value(game.board()).unwrap(),
        serde_json::json!(["", "", "", "", "X", "", "", "", ""])
    );
    assert_eq!(game.winner(), None);
    assert_eq!(game.to_move(), Mark::O);

    let reply = game.apply_computer_move().expect("computer's turn");
    assert!([0, 2, 6, 8].contains(&reply));
    assert_eq!(game.board().get(reply), Some(Cell::Marked(Mark::O)));
    assert_eq!(game.to_move(), Mark::X);
}

#[test]
fn test_completing_row_wins() {
    let mut game = Match::two_player(Mark::X);
    play_all(&mut game, &[0, 3, 1, 4]);
    assert_eq!(game.to_move(), Mark::X);

    let outcome = game.apply_human_move(2, Mark::X).expect("legal");
    assert_eq!(outcome, Some(Outcome::Won(Mark::X)));
    assert_eq!(game.winner(), Some(Outcome::Won(Mark::X)));
    // Turn does not flip once the match is over.
    assert_eq!(game.to_move(), Mark::X);
}

#[test]
fn test_full_board_without_line_is_draw() {
    let mut game = Match::two_player(Mark::X);
    play_all(&mut game, &[0, 1, 2, 4, 3, 5, 7, 6, 8]);
    assert_eq!(
        serde_json::to_value(game.board()).unwrap(),
        serde_json::json!(["X", "O", "X", "X", "O", "O", "O", "X", "X"])
    );
    assert_eq!(game.winner(), Some(Outcome::Draw));
}

#[test]
fn test_terminal_match_rejects_everything() {
    let mut game = Match::two_player(Mark::X);
    play_all(&mut game, &[0, 3, 1, 4, 2]);
    let frozen = game.clone();

    for index in 0..10 {
        for mark in [Mark::X, Mark::O] {
            assert_eq!(game.apply_human_move(index, mark), Err(MoveError::MatchTerminal));
        }
    }
    assert_eq!(game.apply_computer_move(), Err(MoveError::MatchTerminal));
    assert_eq!(game, frozen);
}

#[test]
fn test_turns_alternate() {
    let mut game = Match::two_player(Mark::O);
    let mut expected = Mark::O;
    for index in [4, 0, 8, 2, 1] {
        assert_eq!(game.to_move(), expected);
        game.apply_human_move(index, expected).expect("legal");
        expected = expected.opponent();
    }
    assert_eq!(game.history(), &[4, 0, 8, 2, 1]);
}

#[test]
fn test_rejections_leave_state_unchanged() {
    let mut game = Match::two_player(Mark::X);
    game.apply_human_move(4, Mark::X).unwrap();
    let before = game.clone();

    assert_eq!(game.apply_human_move(4, Mark::O), Err(MoveError::CellOccupied(4)));
    assert_eq!(game.apply_human_move(9, Mark::O), Err(MoveError::InvalidIndex(9)));
    assert_eq!(game.apply_human_move(0, Mark::X), Err(MoveError::WrongTurn(Mark::X)));
    assert_eq!(game, before);
}

#[test]
fn test_computer_mode_seat_checks() {
    let mut game = Match::computer(Mark::X, Mark::X);

    // Computer may not move on the human's turn.
    assert_eq!(game.apply_computer_move(), Err(MoveError::WrongTurn(Mark::O)));

    game.apply_human_move(0, Mark::X).unwrap();
    // Human may not play the computer's mark, nor move on its turn.
    assert_eq!(game.apply_human_move(1, Mark::O), Err(MoveError::WrongTurn(Mark::O)));
    assert_eq!(game.apply_human_move(1, Mark::X), Err(MoveError::WrongTurn(Mark::X)));
    assert!(game.is_computer_turn());
}

#[test]
fn test_two_player_has_no_computer() {
    let mut game = Match::two_player(Mark::X);
    assert!(matches!(game.apply_computer_move(), Err(MoveError::WrongTurn(_))));
    assert!(game.board().empty_indices().count() == 9);
}

#[test]
fn test_computer_opens_when_it_starts() {
    let mut game = Match::computer(Mark::O, Mark::X);
    assert_eq!(game.human_mark(), Some(Mark::O));
    assert_eq!(game.computer_mark(), Some(Mark::X));
    assert!(game.is_computer_turn());

    assert_eq!(game.apply_computer_move(), Ok(0));
    assert_eq!(game.to_move(), Mark::O);
    assert!(game.apply_human_move(4, Mark::O).is_ok());
}

/// Walks every line of human play and lets the computer reply.
fn computer_never_loses(game: Match, human: Mark) {
    if let Some(outcome) = game.winner() {
        assert_ne!(outcome, Outcome::Won(human), "computer lost: {:?}", game.history());
        return;
    }
    if game.is_computer_turn() {
        let mut next = game;
        next.apply_computer_move().expect("computer move");
        computer_never_loses(next, human);
        return;
    }
    for index in game.board().empty_indices() {
        let mut next = game.clone();
        next.apply_human_move(index, human).expect("legal");
        computer_never_loses(next, human);
    }
}

#[test]
fn test_computer_never_loses_as_second_player() {
    computer_never_loses(Match::computer(Mark::X, Mark::X), Mark::X);
}

#[test]
fn test_computer_never_loses_as_first_player() {
    computer_never_loses(Match::computer(Mark::O, Mark::X), Mark::O);
}

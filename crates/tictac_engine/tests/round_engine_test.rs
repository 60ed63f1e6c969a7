//! Behavioural tests for the round state machine.

use proptest::prelude::*;
use tictac_engine::rules::{LINES, check_winner, is_full};
use tictac_engine::{
    Board, Cell, Difficulty, GameStatus, Mark, MoveError, Outcome, RoundEngine, RoundWinner,
};

#[test]
fn test_every_line_wins_before_board_is_full() {
    for line in LINES {
        let others: Vec<usize> = (0..9).filter(|i| !line.contains(i)).collect();
        let mut engine = RoundEngine::new();
        for index in [line[0], others[0], line[1], others[1], line[2]] {
            engine.apply_move(index).expect("legal move");
        }

        assert_eq!(engine.outcome(), Some(Outcome::Won(Mark::X)), "line {line:?}");
        assert_eq!(engine.win_line().unwrap().cells, line);
        assert!(!is_full(engine.board()));
    }
}

#[test]
fn test_o_can_win() {
    let mut engine = RoundEngine::new();
    for index in [0, 6, 1, 4, 8, 2] {
        engine.apply_move(index).expect("legal move");
    }
    assert_eq!(engine.outcome(), Some(Outcome::Won(Mark::O)));
    assert_eq!(engine.round_winner(), Some(RoundWinner::Player2));
}

#[test]
fn test_full_board_without_line_is_draw() {
    let mut engine = RoundEngine::new();
    for index in [0, 1, 2, 3, 4, 6, 5, 8, 7] {
        engine.apply_move(index).expect("legal move");
    }
    assert_eq!(engine.outcome(), Some(Outcome::Draw));
    assert_eq!(engine.round_winner(), Some(RoundWinner::Draw));
    assert!(engine.win_line().is_none());
}

#[test]
fn test_occupied_cell_is_noop() {
    let mut engine = RoundEngine::new();
    engine.apply_move(4).unwrap();
    let before = engine.clone();

    assert_eq!(engine.apply_move(4), Err(MoveError::SquareOccupied(4)));
    assert_eq!(engine, before);
}

#[test]
fn test_countdown_expiry_forces_draw() {
    let mut engine = RoundEngine::new();
    engine.select_difficulty(Difficulty::Hard).unwrap();
    engine.apply_move(0).unwrap();

    for _ in 0..19 {
        assert_eq!(engine.tick(), None);
    }
    assert_eq!(engine.tick(), Some(Outcome::Draw));
    assert!(!engine.is_counting_down());

    // Further ticks and moves change nothing.
    assert_eq!(engine.tick(), Some(Outcome::Draw));
    assert_eq!(engine.apply_move(1), Err(MoveError::RoundOver));
}

#[test]
fn test_countdown_pauses_while_game_stopped() {
    let mut engine = RoundEngine::new();
    engine.select_difficulty(Difficulty::Hard).unwrap();
    engine.set_game_status(GameStatus::Stopped);
    engine.tick();
    assert_eq!(engine.time_left(), 20);
}

#[test]
fn test_difficulty_refused_after_round_over() {
    let mut engine = RoundEngine::new();
    for index in [0, 3, 1, 4, 2] {
        engine.apply_move(index).unwrap();
    }
    assert_eq!(
        engine.select_difficulty(Difficulty::Easy),
        Err(MoveError::RoundOver)
    );
}

#[test]
fn test_snapshot_after_round() {
    let mut engine = RoundEngine::new();
    for index in [0, 3, 1, 4, 2] {
        engine.apply_move(index).unwrap();
    }
    let snapshot = engine.snapshot();
    let x = Cell::Marked(Mark::X);
    let o = Cell::Marked(Mark::O);
    assert_eq!(
        snapshot.rows(),
        &[
            vec![x, x, x],
            vec![o, o, Cell::Empty],
            vec![Cell::Empty, Cell::Empty, Cell::Empty],
        ]
    );
}

proptest! {
    #[test]
    fn prop_outcome_matches_board(order in Just((0..9).collect::<Vec<usize>>()).prop_shuffle()) {
        let mut engine = RoundEngine::new();
        for index in order {
            let mover = engine.to_move();
            match engine.apply_move(index) {
                Ok(Some(Outcome::Won(mark))) => {
                    prop_assert_eq!(mark, mover);
                    prop_assert_eq!(check_winner(engine.board()), Some(mark));
                }
                Ok(Some(Outcome::Draw)) => {
                    prop_assert!(is_full(engine.board()));
                    prop_assert_eq!(check_winner(engine.board()), None);
                }
                Ok(None) => {
                    prop_assert_eq!(check_winner(engine.board()), None);
                    prop_assert!(!is_full(engine.board()));
                }
                Err(err) => {
                    prop_assert_eq!(err, MoveError::RoundOver);
                }
            }
        }
        prop_assert!(engine.is_over());
    }

    #[test]
    fn prop_moves_after_outcome_are_noops(
        order in Just((0..9).collect::<Vec<usize>>()).prop_shuffle(),
        extra in 0usize..12,
    ) {
        let mut engine = RoundEngine::new();
        for index in order {
            if engine.is_over() {
                break;
            }
            engine.apply_move(index).unwrap();
        }
        let before = engine.clone();
        prop_assert!(engine.apply_move(extra).is_err());
        prop_assert_eq!(engine, before);
    }

    #[test]
    fn prop_marks_never_overwritten(order in proptest::collection::vec(0usize..9, 1..30)) {
        let mut engine = RoundEngine::new();
        let mut seen = Board::new();
        for index in order {
            let mover = engine.to_move();
            if engine.apply_move(index).is_ok() {
                prop_assert_eq!(seen.get(index), Some(Cell::Empty));
                seen.set(index, Cell::Marked(mover)).unwrap();
            }
            prop_assert_eq!(engine.board(), &seen);
        }
    }
}

//! Win detection logic for tic-tac-toe.

use crate::{Board, Cell, Mark};
use tracing::instrument;

/// The eight winning lines in evaluation order: rows, then columns, then diagonals.
pub const LINES: [[usize; 3]; 8] = [
    // Rows
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    // Columns
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    // Diagonals
    [0, 4, 8],
    [2, 4, 6],
];

/// A completed line of three equal marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WinLine {
    /// Owner of the line.
    pub mark: Mark,
    /// Cell indices forming the line.
    pub cells: [usize; 3],
}

/// Finds the first line holding three equal marks.
///
/// Lines are checked in [`LINES`] order, so when several lines are complete
/// the earliest one is reported.
#[instrument(skip(board))]
pub fn winning_line(board: &Board) -> Option<WinLine> {
    LINES.iter().find_map(|&[a, b, c]| {
        let cell = board.get(a)?;
        match cell {
            Cell::Marked(mark) if board.get(b) == Some(cell) && board.get(c) == Some(cell) => {
                Some(WinLine {
                    mark,
                    cells: [a, b, c],
                })
            }
            _ => None,
        }
    })
}

/// Checks if there is a winner on the board.
#[instrument(skip(board))]
pub fn check_winner(board: &Board) -> Option<Mark> {
    winning_line(board).map(|line| line.mark)
}

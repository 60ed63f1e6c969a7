//! Core board types for tic-tac-toe.

use serde::{Deserialize, Serialize};

/// Mark placed by a player. X always moves first.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
pub enum Mark {
    /// Player X (goes first, belongs to `player1`).
    X,
    /// Player O (goes second, belongs to `player2`).
    O,
}

impl Mark {
    /// Returns the opposing mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// A single cell on the board.
///
/// On the wire a cell is the string `""`, `"X"` or `"O"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Cell {
    /// Nobody has played here yet.
    #[default]
    Empty,
    /// Cell holds a mark.
    Marked(Mark),
}

impl Cell {
    /// Wire representation of the cell.
    pub fn as_str(&self) -> &'static str {
        match self {
            Cell::Empty => "",
            Cell::Marked(Mark::X) => "X",
            Cell::Marked(Mark::O) => "O",
        }
    }

    /// Returns the mark in this cell, if any.
    pub fn mark(&self) -> Option<Mark> {
        match self {
            Cell::Empty => None,
            Cell::Marked(mark) => Some(*mark),
        }
    }
}

impl From<Cell> for String {
    fn from(cell: Cell) -> Self {
        cell.as_str().to_string()
    }
}

impl TryFrom<String> for Cell {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "" => Ok(Cell::Empty),
            "X" => Ok(Cell::Marked(Mark::X)),
            "O" => Ok(Cell::Marked(Mark::O)),
            other => Err(format!("invalid cell '{other}', expected \"\", \"X\" or \"O\"")),
        }
    }
}

/// 3x3 board stored in row-major order (indices 0-8).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Board {
    cells: [Cell; 9],
}

impl Board {
    /// Number of cells on the board.
    pub const SIZE: usize = 9;

    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the cell at the given index (0-8).
    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    /// Sets the cell at the given index.
    pub fn set(&mut self, index: usize, cell: Cell) -> Result<(), &'static str> {
        let slot = self.cells.get_mut(index).ok_or("Cell index out of bounds")?;
        *slot = cell;
        Ok(())
    }

    /// Checks whether the cell at `index` exists and is empty.
    pub fn is_empty(&self, index: usize) -> bool {
        matches!(self.get(index), Some(Cell::Empty))
    }

    /// Returns all cells.
    pub fn cells(&self) -> &[Cell; 9] {
        &self.cells
    }

    /// Copies the board into a 3x3 snapshot, one row per entry.
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot(self.cells.chunks(3).map(|row| row.to_vec()).collect())
    }

    /// Formats the board for a terminal, numbering free cells 1-9.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..3 {
            for col in 0..3 {
                let index = row * 3 + col;
                let symbol = match self.cells[index] {
                    Cell::Empty => (index + 1).to_string(),
                    Cell::Marked(mark) => mark.to_string(),
                };
                result.push_str(&symbol);
                if col < 2 {
                    result.push('|');
                }
            }
            if row < 2 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}

/// Board as submitted with a finished round: a list of rows.
///
/// An empty snapshot (`[]`) means no board was recorded.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardSnapshot(Vec<Vec<Cell>>);

impl BoardSnapshot {
    /// Wraps raw rows without checking their shape.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        Self(rows)
    }

    /// Returns the rows of the snapshot.
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.0
    }

    /// True when no board was recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// A snapshot is well formed when it is empty or exactly 3 rows of 3 cells.
    pub fn is_well_formed(&self) -> bool {
        self.0.is_empty() || (self.0.len() == 3 && self.0.iter().all(|row| row.len() == 3))
    }
}

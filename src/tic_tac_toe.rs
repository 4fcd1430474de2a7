use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Result};

use crate::game::Game;

/// The eight winning lines, checked in this order: rows, columns, diagonals.
pub(crate) const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Mark {
    X,
    O,
}

impl Mark {
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Mark::X => write!(f, "X"),
            Mark::O => write!(f, "O"),
        }
    }
}

impl FromStr for Mark {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "X" => Ok(Mark::X),
            "O" => Ok(Mark::O),
            other => bail!("not a mark: {:?}", other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Cell {
    Empty,
    Filled(Mark),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GameOutcome {
    InProgress,
    Win(Mark),
    Draw,
}

/// 3x3 grid, cells indexed 0-8 in row-major order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Board {
    cells: [Cell; 9],
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; 9],
        }
    }

    pub fn cell(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    pub fn available_moves(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| **cell == Cell::Empty)
            .map(|(index, _)| index)
            .collect()
    }

    pub fn winner(&self) -> Option<Mark> {
        for [a, b, c] in LINES {
            if let Cell::Filled(mark) = self.cells[a] {
                if self.cells[b] == Cell::Filled(mark) && self.cells[c] == Cell::Filled(mark) {
                    return Some(mark);
                }
            }
        }
        None
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| *cell != Cell::Empty)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|cell| *cell == Cell::Empty)
    }

    pub fn outcome(&self) -> GameOutcome {
        if let Some(mark) = self.winner() {
            GameOutcome::Win(mark)
        } else if self.is_full() {
            GameOutcome::Draw
        } else {
            GameOutcome::InProgress
        }
    }

    /// Puts `mark` on `index`, refusing out-of-range or occupied cells.
    pub fn play(&mut self, index: usize, mark: Mark) -> Result<()> {
        match self.cell(index) {
            Some(Cell::Empty) => {
                self.cells[index] = Cell::Filled(mark);
                Ok(())
            }
            Some(Cell::Filled(_)) => bail!("cell {} is already filled", index + 1),
            None => bail!("cell {} is off the board", index + 1),
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for Board {
    type Action = usize;
    type Player = Mark;

    fn available_moves(&self) -> Vec<usize> {
        Board::available_moves(self)
    }

    fn winner(&self) -> Option<Mark> {
        Board::winner(self)
    }

    fn is_full(&self) -> bool {
        Board::is_full(self)
    }

    fn place(&mut self, action: usize, player: Mark) {
        self.cells[action] = Cell::Filled(player);
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in 0..3 {
            if row > 0 {
                writeln!(f, "---+---+---")?;
            }
            for col in 0..3 {
                let index = row * 3 + col;
                if col > 0 {
                    write!(f, "|")?;
                }
                match self.cells[index] {
                    Cell::Empty => write!(f, " {} ", index + 1)?,
                    Cell::Filled(mark) => write!(f, " {} ", mark)?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Builds a board from a 9-character pattern of `X`, `O` and `.`.
#[cfg(test)]
pub(crate) fn board(pattern: &str) -> Board {
    let mut cells = [Cell::Empty; 9];
    for (cell, ch) in cells.iter_mut().zip(pattern.chars()) {
        *cell = match ch {
            'X' => Cell::Filled(Mark::X),
            'O' => Cell::Filled(Mark::O),
            _ => Cell::Empty,
        };
    }
    Board { cells }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::{Display, EnumIter, EnumString};

/// Number of cells on the board
pub const CELL_COUNT: usize = 9;

/// The center cell, row-major index
pub const CENTER: usize = 4;

/// Every line that wins the game when filled with a single symbol
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// The mark a player places on the board
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
pub enum Symbol {
    X,
    O,
}

impl Symbol {
    pub fn opponent(self) -> Self {
        match self {
            Symbol::X => Symbol::O,
            Symbol::O => Symbol::X,
        }
    }
}

/// A single square: `None` while empty
pub type Cell = Option<Symbol>;

/// Terminal result of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    #[serde(rename = "X")]
    XWins,
    #[serde(rename = "O")]
    OWins,
    #[serde(rename = "draw")]
    Draw,
}

impl Outcome {
    pub fn win_for(symbol: Symbol) -> Self {
        match symbol {
            Symbol::X => Outcome::XWins,
            Symbol::O => Outcome::OWins,
        }
    }

    /// The winning symbol, `None` for a draw
    pub fn winner(self) -> Option<Symbol> {
        match self {
            Outcome::XWins => Some(Symbol::X),
            Outcome::OWins => Some(Symbol::O),
            Outcome::Draw => None,
        }
    }
}

/// 3x3 grid laid out row-major
///
/// ```text
/// 0 | 1 | 2
/// 3 | 4 | 5
/// 6 | 7 | 8
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board([Cell; CELL_COUNT]);

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cells(cells: [Cell; CELL_COUNT]) -> Self {
        Self(cells)
    }

    /// Cell at `index`, `None` when out of range
    pub fn get(&self, index: usize) -> Option<Cell> {
        self.0.get(index).copied()
    }

    /// Board with `symbol` written at `index`; the receiver is left untouched.
    /// Callers validate the index and that the cell is empty.
    pub fn with_mark(&self, index: usize, symbol: Symbol) -> Self {
        let mut next = *self;
        next.0[index] = Some(symbol);
        next
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }

    pub fn is_full(&self) -> bool {
        self.0.iter().all(Option::is_some)
    }

    /// Indices of empty cells in ascending order
    pub fn empty_cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(index, _)| index)
    }

    pub fn marks(&self) -> usize {
        self.0.iter().filter(|cell| cell.is_some()).count()
    }

    /// Winner via any of the eight lines, else a draw on a full board, else `None`
    pub fn evaluate(&self) -> Option<Outcome> {
        for [a, b, c] in WINNING_LINES {
            if let Some(symbol) = self.0[a] {
                if self.0[b] == Some(symbol) && self.0[c] == Some(symbol) {
                    return Some(Outcome::win_for(symbol));
                }
            }
        }

        if self.is_full() {
            return Some(Outcome::Draw);
        }

        None
    }
}

/// Free-function form of [`Board::evaluate`]
pub fn evaluate(board: &Board) -> Option<Outcome> {
    board.evaluate()
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, cells) in self.0.chunks(3).enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            for cell in cells {
                match cell {
                    Some(symbol) => write!(f, "{}", symbol)?,
                    None => write!(f, ".")?,
                }
            }
        }
        Ok(())
    }
}

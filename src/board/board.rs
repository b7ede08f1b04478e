//! Board structure with copy-on-write moves

use std::fmt;
use std::str::FromStr;

use super::{Cell, Mark};
use crate::error::BoardError;

/// Square game board, stored row-major (`index = row * size + col`).
///
/// Search code never mutates a board shared between branches: every
/// hypothetical move goes through [`Board::with_move`], which returns a new
/// value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Create an empty `size x size` board
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![None; size * size],
        }
    }

    /// Build a board from a row-major cell snapshot.
    ///
    /// # Errors
    /// Returns [`BoardError::WrongLength`] if `cells.len() != size * size`.
    pub fn from_cells(size: usize, cells: Vec<Cell>) -> Result<Self, BoardError> {
        if cells.len() != size * size {
            return Err(BoardError::WrongLength {
                size,
                expected: size * size,
                actual: cells.len(),
            });
        }
        Ok(Self { size, cells })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of squares (`size²`)
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Get the cell at `index`; out-of-range indices read as empty
    #[inline]
    pub fn get(&self, index: usize) -> Cell {
        self.cells.get(index).copied().flatten()
    }

    /// Check if the square at `index` exists and is empty
    #[inline]
    pub fn is_empty_at(&self, index: usize) -> bool {
        matches!(self.cells.get(index), Some(None))
    }

    /// Return a copy of this board with `mark` placed at `index`
    #[must_use]
    pub fn with_move(&self, index: usize, mark: Mark) -> Board {
        let mut next = self.clone();
        next.cells[index] = Some(mark);
        next
    }

    /// Return a copy of this board with the square at `index` cleared
    #[must_use]
    pub fn without(&self, index: usize) -> Board {
        let mut next = self.clone();
        next.cells[index] = None;
        next
    }

    /// Empty squares in ascending index order
    pub fn available_moves(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.is_none().then_some(i))
            .collect()
    }

    /// Number of marks of one player
    pub fn count(&self, mark: Mark) -> usize {
        self.cells.iter().filter(|c| **c == Some(mark)).count()
    }

    /// Total marks on the board
    pub fn mark_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Check if no empty square remains
    #[inline]
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.size + col
    }

    #[inline]
    pub fn row_col(&self, index: usize) -> (usize, usize) {
        (index / self.size, index % self.size)
    }

    /// Center square (upper-left of the central four on even sizes)
    #[inline]
    pub fn center(&self) -> usize {
        (self.size / 2) * self.size + self.size / 2
    }

    /// Corner squares: top-left, top-right, bottom-left, bottom-right
    pub fn corners(&self) -> [usize; 4] {
        let n = self.size;
        [0, n.saturating_sub(1), n * n.saturating_sub(1), (n * n).saturating_sub(1)]
    }

    /// Check if `index` lies on the outer ring of the board
    pub fn is_border(&self, index: usize) -> bool {
        let (row, col) = self.row_col(index);
        row == 0 || col == 0 || row + 1 == self.size || col + 1 == self.size
    }
}

impl fmt::Display for Board {
    /// Canonical row-major key: `X`, `O` or `.` per square
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cell in &self.cells {
            let c = match cell {
                Some(mark) => mark.symbol(),
                None => '.',
            };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = BoardError;

    /// Parse `X`/`O` and `.`/`_`/`-` squares; whitespace and `/` are ignored.
    /// The size is the square root of the number of squares.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cells = Vec::with_capacity(s.len());
        for ch in s.chars() {
            match ch {
                'X' | 'x' => cells.push(Some(Mark::X)),
                'O' | 'o' => cells.push(Some(Mark::O)),
                '.' | '_' | '-' => cells.push(None),
                '/' => {}
                c if c.is_whitespace() => {}
                c => return Err(BoardError::UnknownSymbol(c)),
            }
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let size = (cells.len() as f64).sqrt().round() as usize;
        if size * size != cells.len() || size == 0 {
            return Err(BoardError::NotSquare(cells.len()));
        }
        Self::from_cells(size, cells)
    }
}

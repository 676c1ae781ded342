//! Maze grid representation and loading

use std::{fmt, fs, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A cell on the maze grid, addressed by row and column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Offset this cell by a signed delta, returning `None` below zero.
    pub fn offset(self, d_row: isize, d_col: isize) -> Option<Cell> {
        Some(Cell {
            row: self.row.checked_add_signed(d_row)?,
            col: self.col.checked_add_signed(d_col)?,
        })
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Self {
        Cell::new(row, col)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Immutable maze of free and blocked cells
///
/// Cells are stored row-major. The maze is never mutated after construction,
/// so every structure derived from it (state index, Q-table shape) stays valid
/// for the lifetime of an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maze {
    rows: usize,
    cols: usize,
    free: Vec<bool>,
}

impl Maze {
    /// Build a maze from raw markers: `0` is free, anything else is a wall.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyMaze`] for an empty grid and [`Error::RaggedMaze`]
    /// when rows differ in length.
    pub fn from_rows(rows: Vec<Vec<u8>>) -> Result<Self> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        if cols == 0 {
            return Err(Error::EmptyMaze);
        }

        let mut free = Vec::with_capacity(rows.len() * cols);
        for (index, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(Error::RaggedMaze {
                    row: index,
                    expected: cols,
                    got: row.len(),
                });
            }
            free.extend(row.iter().map(|&marker| marker == 0));
        }

        Ok(Self {
            rows: rows.len(),
            cols,
            free,
        })
    }

    /// A maze with every cell free.
    pub fn open(rows: usize, cols: usize) -> Result<Self> {
        Self::from_rows(vec![vec![0; cols]; rows])
    }

    /// Load a text maze from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            operation: format!("read maze file {}", path.display()),
            source,
        })?;
        text.parse()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Whether the cell lies inside the grid bounds.
    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    /// Whether the cell is in bounds and not a wall.
    pub fn is_free(&self, cell: Cell) -> bool {
        self.contains(cell) && self.free[self.offset(cell)]
    }

    /// Free cells in row-major order.
    pub fn free_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.rows)
            .flat_map(move |row| (0..self.cols).map(move |col| Cell::new(row, col)))
            .filter(|&cell| self.is_free(cell))
    }

    pub fn free_count(&self) -> usize {
        self.free.iter().filter(|&&free| free).count()
    }

    /// Row-major offset of an in-bounds cell.
    pub(crate) fn offset(&self, cell: Cell) -> usize {
        cell.row * self.cols + cell.col
    }

    pub(crate) fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Check that a position is a free cell, for use at API boundaries.
    pub fn require_free(&self, cell: Cell) -> Result<()> {
        if self.is_free(cell) {
            Ok(())
        } else {
            Err(Error::InvalidPosition {
                cell,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }
}

impl FromStr for Maze {
    type Err = Error;

    /// Parse one row per line; `0` marks a free cell, any other digit a wall.
    /// Whitespace and commas between markers are ignored, as are blank lines.
    fn from_str(s: &str) -> Result<Self> {
        let mut rows = Vec::new();
        for line in s.lines().filter(|line| !line.trim().is_empty()) {
            let row_index = rows.len();
            let mut row = Vec::new();
            for (col, character) in line
                .chars()
                .filter(|c| !c.is_whitespace() && *c != ',')
                .enumerate()
            {
                let marker = character
                    .to_digit(10)
                    .ok_or(Error::InvalidMazeCharacter {
                        character,
                        row: row_index,
                        col,
                    })?;
                row.push(marker as u8);
            }
            rows.push(row);
        }
        Self::from_rows(rows)
    }
}

impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            for col in 0..self.cols {
                let marker = if self.is_free(Cell::new(row, col)) { '0' } else { '1' };
                write!(f, "{marker}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

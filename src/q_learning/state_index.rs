//! Dense indexing of joint (cat, mouse) states

use crate::{
    Error, Result,
    maze::{Cell, Maze},
};

/// Bijection between joint states and Q-table rows.
///
/// Free cells are numbered row-major. The joint index is cat-major,
/// mouse-minor: `ordinal(cat) * free_cells + ordinal(mouse)`, so there are
/// exactly `free_cells²` rows and no gaps.
#[derive(Debug, Clone)]
pub struct StateIndex {
    rows: usize,
    cols: usize,
    /// Row-major grid offset -> free-cell ordinal
    ordinals: Vec<Option<usize>>,
    cells: Vec<Cell>,
}

impl StateIndex {
    pub fn new(maze: &Maze) -> Self {
        let cells: Vec<Cell> = maze.free_cells().collect();
        let mut ordinals = vec![None; maze.cell_count()];
        for (ordinal, &cell) in cells.iter().enumerate() {
            ordinals[maze.offset(cell)] = Some(ordinal);
        }

        Self {
            rows: maze.rows(),
            cols: maze.cols(),
            ordinals,
            cells,
        }
    }

    /// Number of free cells in the indexed maze.
    pub fn free_cells(&self) -> usize {
        self.cells.len()
    }

    /// Number of joint states, i.e. Q-table rows.
    pub fn len(&self) -> usize {
        self.cells.len() * self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn ordinal(&self, cell: Cell) -> Option<usize> {
        if cell.row >= self.rows || cell.col >= self.cols {
            return None;
        }
        self.ordinals[cell.row * self.cols + cell.col]
    }

    /// Row of the joint state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownJointState`] if either cell is out of bounds or
    /// a wall.
    pub fn index_of(&self, cat: Cell, mouse: Cell) -> Result<usize> {
        match (self.ordinal(cat), self.ordinal(mouse)) {
            (Some(c), Some(m)) => Ok(c * self.cells.len() + m),
            _ => Err(Error::UnknownJointState {
                cat,
                mouse,
                rows: self.rows,
                cols: self.cols,
            }),
        }
    }

    /// Joint state stored at a row, the inverse of [`StateIndex::index_of`].
    pub fn state_at(&self, index: usize) -> Option<(Cell, Cell)> {
        let n = self.cells.len();
        if index >= self.len() {
            return None;
        }
        Some((self.cells[index / n], self.cells[index % n]))
    }
}

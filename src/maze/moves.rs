//! Discrete actions and the move validator

use std::fmt;

use serde::{Deserialize, Serialize};

use super::grid::{Cell, Maze};
use crate::{Error, Result};

/// Number of discrete actions, i.e. Q-table columns
pub const ACTION_COUNT: usize = 5;

/// A movement action. The discriminant is the Q-table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
    Stay = 4,
}

impl Action {
    /// All actions in column order.
    pub const ALL: [Action; ACTION_COUNT] = [
        Action::Up,
        Action::Down,
        Action::Left,
        Action::Right,
        Action::Stay,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Result<Self> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(Error::InvalidAction { index })
    }

    /// Row and column delta applied by this action.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Action::Up => (-1, 0),
            Action::Down => (1, 0),
            Action::Left => (0, -1),
            Action::Right => (0, 1),
            Action::Stay => (0, 0),
        }
    }

    /// Destination cell, ignoring walls. `None` when it would leave the grid
    /// through row or column zero.
    pub fn target(self, from: Cell) -> Option<Cell> {
        let (d_row, d_col) = self.delta();
        from.offset(d_row, d_col)
    }
}

impl TryFrom<usize> for Action {
    type Error = Error;

    fn try_from(index: usize) -> Result<Self> {
        Self::from_index(index)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Up => "up",
            Action::Down => "down",
            Action::Left => "left",
            Action::Right => "right",
            Action::Stay => "stay",
        };
        f.write_str(name)
    }
}

/// Legal actions from `from`, in column order.
///
/// `Stay` is always legal. A directional move is legal when it lands on a free
/// in-bounds cell; when `other` is given, landing on that cell is also ruled
/// out. The result is never empty.
pub fn valid_moves(maze: &Maze, from: Cell, other: Option<Cell>) -> Vec<Action> {
    Action::ALL
        .into_iter()
        .filter(|&action| match action {
            Action::Stay => true,
            _ => action
                .target(from)
                .is_some_and(|to| maze.is_free(to) && Some(to) != other),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_index_round_trip() {
        for action in Action::ALL {
            assert_eq!(Action::from_index(action.index()).unwrap(), action);
        }
        assert!(matches!(
            Action::from_index(5),
            Err(Error::InvalidAction { index: 5 })
        ));
    }

    #[test]
    fn test_corner_moves() {
        let maze = Maze::open(3, 3).unwrap();
        let moves = valid_moves(&maze, Cell::new(0, 0), None);
        assert_eq!(moves, vec![Action::Down, Action::Right, Action::Stay]);
    }

    #[test]
    fn test_center_has_every_move() {
        let maze = Maze::open(3, 3).unwrap();
        assert_eq!(valid_moves(&maze, Cell::new(1, 1), None), Action::ALL.to_vec());
    }

    #[test]
    fn test_walls_block_moves() {
        let maze: Maze = "010\n111\n000\n".parse().unwrap();
        assert_eq!(valid_moves(&maze, Cell::new(0, 0), None), vec![Action::Stay]);
    }

    #[test]
    fn test_opponent_cell_excluded_when_given() {
        let maze = Maze::open(1, 3).unwrap();
        let from = Cell::new(0, 1);
        let open = valid_moves(&maze, from, None);
        let occupied = valid_moves(&maze, from, Some(Cell::new(0, 2)));
        assert!(open.contains(&Action::Right));
        assert!(!occupied.contains(&Action::Right));
        assert!(occupied.contains(&Action::Left));
    }

    #[test]
    fn test_stay_always_valid() {
        let maze: Maze = "0101\n1010\n0101\n".parse().unwrap();
        for cell in maze.free_cells() {
            let moves = valid_moves(&maze, cell, None);
            assert!(!moves.is_empty());
            assert!(moves.contains(&Action::Stay));
        }
    }
}

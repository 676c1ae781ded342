//! Grid maze, shortest paths and legal moves

pub mod grid;
pub mod moves;
pub mod path;

pub use grid::{Cell, Maze};
pub use moves::{ACTION_COUNT, Action, valid_moves};
pub use path::{Distance, distance, shortest_path};

//! Error types for the catmouse crate

use thiserror::Error;

use crate::maze::Cell;

/// Main error type for the catmouse crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error(
        "joint state (cat {cat}, mouse {mouse}) is not a pair of free cells in the {rows}x{cols} maze"
    )]
    UnknownJointState {
        cat: Cell,
        mouse: Cell,
        rows: usize,
        cols: usize,
    },

    #[error("position {cell} is not a free cell in the {rows}x{cols} maze")]
    InvalidPosition { cell: Cell, rows: usize, cols: usize },

    #[error(
        "Q-table has {got} rows but the maze has {free_cells} free cells ({expected} joint states)"
    )]
    TableShapeMismatch {
        expected: usize,
        got: usize,
        free_cells: usize,
    },

    #[error("Q-table snapshot belongs to the {got} but was loaded for the {expected}")]
    TableRoleMismatch { expected: String, got: String },

    #[error("unsupported Q-table snapshot version {version} (expected {expected})")]
    UnsupportedSnapshotVersion { version: u32, expected: u32 },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("action index {index} is out of range (must be 0-4)")]
    InvalidAction { index: usize },

    #[error("maze has no cells")]
    EmptyMaze,

    #[error("maze row {row} has {got} cells, expected {expected}")]
    RaggedMaze {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("invalid character '{character}' at row {row}, column {col} of maze")]
    InvalidMazeCharacter { character: char, row: usize, col: usize },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to {operation}: {message}")]
    SerializationContext { operation: String, message: String },

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}

//! Tabular Q-learning for the pursuit game
//!
//! Each agent keeps a dense Q-table with one row per joint (cat, mouse)
//! state and one column per [`Action`](crate::maze::Action), and learns with
//! the off-policy one-step update
//!
//! ```text
//! Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
//! ```
//!
//! Rewards are shaped by the shortest-path distance between the two agents:
//! the cat is paid for closing in, the mouse for getting away, and a capture
//! carries a ±10 terminal bonus.
//!
//! ## Usage Example
//!
//! ```
//! use catmouse::app::AgentConfig;
//! use catmouse::maze::{Cell, Maze};
//! use catmouse::q_learning::{QLearningAgent, Role, SelectionMode};
//!
//! let maze = Maze::open(3, 3)?;
//! let mut cat = QLearningAgent::new(Role::Cat, maze, AgentConfig::for_role(Role::Cat))?;
//! let action = cat.select_action(Cell::new(0, 0), Cell::new(2, 2), SelectionMode::Train)?;
//! # let _ = action;
//! # Ok::<(), catmouse::Error>(())
//! ```

pub mod agent;
pub mod q_table;
pub mod role;
pub mod serialization;
pub mod state_index;

// Public re-exports
pub use agent::{QLearningAgent, SelectionMode, Transition};
pub use q_table::QTable;
pub use role::{CAUGHT_BONUS, Role};
pub use serialization::QTableSnapshot;
pub use state_index::StateIndex;

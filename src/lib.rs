//! Cat-and-mouse pursuit learned with tabular Q-learning
//!
//! This crate provides:
//! - A grid maze with breadth-first shortest paths and a move validator
//! - Dense joint-state indexing and Q-tables for two opposing agents
//! - Distance-shaped rewards and an exponentially decaying exploration rate
//! - Q-table snapshots through a pluggable storage port
//! - A pursuit environment with training and evaluation loops

pub mod adapters;
pub mod app;
pub mod cli;
pub mod error;
pub mod maze;
pub mod pipeline;
pub mod ports;
pub mod q_learning;

pub use error::{Error, Result};
pub use maze::{Action, Cell, Maze};
pub use q_learning::{QLearningAgent, Role, SelectionMode, Transition};

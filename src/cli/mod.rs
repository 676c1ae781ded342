//! CLI infrastructure for training and evaluating pursuit agents

pub mod commands;
pub mod output;

//! Subcommands of the `catmouse` binary

pub mod evaluate;
pub mod train;

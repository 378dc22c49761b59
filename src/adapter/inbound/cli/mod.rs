//! CLI module graph.

pub mod command;
pub mod settle;
pub mod watch;

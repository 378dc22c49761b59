//! Application services (use cases).
//!
//! These services orchestrate domain logic over the outbound ports:
//! price watching across chains and profit settlement into the vault.

pub mod retry;
pub mod settlement;
pub mod watcher;

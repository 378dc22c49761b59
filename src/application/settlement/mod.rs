//! Post-session profit settlement.

pub mod auto;
pub mod orchestrator;

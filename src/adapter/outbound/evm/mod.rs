//! EVM JSON-RPC adapters.

pub mod state_view;

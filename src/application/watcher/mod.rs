//! Cross-chain price watcher.
//!
//! [`service::PriceWatcher`] polls the pool on two chains through one
//! [`reader::ChainPriceReader`] each, keeps the latest snapshot and fans
//! discrepancies out through [`subscription`] handles.

pub mod reader;
pub mod service;
pub mod subscription;

//! Infrastructure layer.
//!
//! Technical concerns that support the application without containing
//! business logic: configuration loading and validation, logging setup,
//! and wiring adapters into application services.
//!
//! # Submodules
//!
//! - [`bootstrap`] - Composition root for runtime wiring
//! - [`config`] - Configuration loading and validation
//! - [`operator`] - Operator use cases behind the CLI

pub mod bootstrap;
pub mod config;
pub mod operator;

//! Chain-agnostic domain types and math.

pub mod chain;
pub mod id;
pub mod price;
pub mod settlement;
pub mod sqrt_price;
pub mod wallet;

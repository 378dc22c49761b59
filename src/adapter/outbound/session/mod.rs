//! Session result sources.

pub mod manual;

//! CLI command implementations.

pub mod check;
pub mod notices;
pub mod remove;

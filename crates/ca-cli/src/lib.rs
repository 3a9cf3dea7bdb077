//! Controller activity audit CLI library.
//!
//! This crate provides the CLI interface for the controller activity
//! auditor.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use config::Config;

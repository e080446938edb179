//! # repo-cli
//!
//! `docstore` binary support: argument parsing, config loading and command execution.

pub mod cli;
pub mod commands;

pub use cli::{load_config, Cli, Commands};
pub use commands::execute;

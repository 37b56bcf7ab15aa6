//! Library half of the `fernet` command-line tool.
//!
//! The binary only parses arguments; configuration, logging setup and the
//! subcommand logic live here so they can be tested without spawning it.

pub mod commands;
pub mod config;
pub mod error;
pub mod logging;

pub use config::CliConfig;
pub use error::CliError;

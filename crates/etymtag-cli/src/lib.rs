//! etymtag CLI library.
//!
//! Configuration, token input parsing, command execution and output
//! formatting for the `etymtag` binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod tokens;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;

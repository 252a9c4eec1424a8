//! CLI module for searchkit
//!
//! Provides command-line interface for:
//! - compile: Compile a search request from stdin
//! - check: Report field path authorization

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check, compile, run, run_command};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{error_response, ok_response, read_request, write_json};

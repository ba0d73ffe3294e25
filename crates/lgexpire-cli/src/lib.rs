//! # lgexpire-cli
//!
//! Command-line interface for [`lgexpire`].
//!
//! Provides commands for:
//! - Running a retention pass over a log directory
//! - Previewing which files a pass would delete
//! - Inspecting how file names are parsed
//! - Writing a sample configuration file

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;

pub use cli::{Cli, Commands, Format, RunArgs, SelectionArgs};
pub use error::CliError;
pub use output::OutputFormat;

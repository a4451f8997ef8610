//! textref CLI - a command-line host for the text reference field.
//!
//! Commands:
//! - `textref save [TEXT]`: parse edited text into the stored JSON value
//! - `textref display [VALUE]`: render a stored value (array, string, list, inline)
//! - `textref edit [VALUE]`: render a stored value as the editable string
//!
//! Exit codes:
//! - 0: Success
//! - 1: Error

pub mod cli;
pub mod commands;
pub mod error;

pub use cli::{Cli, Commands, FieldArgs, OutputFormat};
pub use error::{CliError, Result};

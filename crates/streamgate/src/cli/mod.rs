//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the streamgate binary.

mod commands;
mod handlers;

pub use commands::{Cli, Commands, DescriptorArgs, OverrideArgs};
pub use handlers::{print_token, show_config, verify_link};

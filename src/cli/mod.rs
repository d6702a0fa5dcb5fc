//! CLI module
//!
//! Command-line interface over the pagination engine.
//!
//! # Commands
//!
//! - `ping` - Check the access token
//! - `list` - Stream the items of an endpoint, optionally sliced
//! - `count` - Count the items of an endpoint
//! - `demo` - Run the engine over an in-memory source

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat, PagingArgs, SliceArgs};
pub use runner::Runner;

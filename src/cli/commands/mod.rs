//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. Every command receives a
//! [`CommandContext`] holding the working directory, the global config
//! location and the process executor, and loads the documents it needs.

pub mod completions;
pub mod dispatcher;
pub mod install;
pub mod interpreter;
pub mod set_default;
pub mod template;
pub mod venv;

pub use dispatcher::{Command, CommandContext, CommandDispatcher, CommandResult};

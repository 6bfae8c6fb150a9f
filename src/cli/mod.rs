//! Command-line interface for pynstal.
//!
//! This module provides the CLI argument parsing using clap's derive macros
//! and command implementations.
//!
//! # Architecture
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{
    Cli, Commands, CompletionsArgs, CreateFromTemplateArgs, CreateVenvArgs, EnvironmentFlags,
    InstallArgs, RemoveVenvArgs, SetDefaultArgs,
};
pub use commands::interpreter::{InterpreterArgs, InterpreterSubcommand};
pub use commands::template::{TemplateArgs, TemplateSubcommand};
pub use commands::{Command, CommandContext, CommandDispatcher, CommandResult};

//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use super::commands::interpreter::InterpreterArgs;
use super::commands::template::TemplateArgs;

/// Pynstal - Python interpreter, virtualenv and package template manager.
#[derive(Debug, Parser)]
#[command(name = "pynstal")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Working directory used for project lookups (overrides current directory)
    #[arg(short = 'C', long = "directory", global = true, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Directory holding the global registry and templates (default ~/.pynstal)
    #[arg(long, global = true, env = "PYNSTAL_HOME", value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Show verbose output, including venv and pip output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Never prompt; answer prompts from PYNSTAL_PROMPT_* or their defaults
    #[arg(long, global = true)]
    pub non_interactive: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage registered Python interpreters
    Interpreter(InterpreterArgs),

    /// Set the global or project default interpreter
    SetDefaultInterpreter(SetDefaultArgs),

    /// Create a virtual environment
    CreateVenv(CreateVenvArgs),

    /// Create a virtual environment and install a template into it
    CreateFromTemplate(CreateFromTemplateArgs),

    /// Delete a virtual environment
    RemoveVenv(RemoveVenvArgs),

    /// Install a template into an existing environment
    Install(InstallArgs),

    /// Manage package templates
    Template(TemplateArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `set-default-interpreter` command.
#[derive(Debug, Clone, clap::Args)]
pub struct SetDefaultArgs {
    /// Interpreter to make the default
    #[arg(required_unless_present = "clear")]
    pub path: Option<PathBuf>,

    /// Register the interpreter first if it is not registered yet
    #[arg(long, conflicts_with = "project")]
    pub register: bool,

    /// Set the default for the current project instead of globally
    #[arg(long)]
    pub project: bool,

    /// Remove the project default (requires --project)
    #[arg(long, requires = "project", conflicts_with = "path")]
    pub clear: bool,
}

/// Arguments for the `create-venv` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CreateVenvArgs {
    /// Directory of the new environment
    pub venv_dir: PathBuf,

    #[command(flatten)]
    pub env: EnvironmentFlags,
}

/// Arguments for the `create-from-template` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CreateFromTemplateArgs {
    /// Template to install
    pub template: String,

    /// Directory of the new environment
    pub venv_dir: PathBuf,

    #[command(flatten)]
    pub env: EnvironmentFlags,
}

/// Flags shared by the environment-creating commands.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct EnvironmentFlags {
    /// Interpreter to use (defaults to the project or global default)
    #[arg(short, long, value_name = "PATH")]
    pub interpreter: Option<PathBuf>,

    /// Print the commands instead of running them
    #[arg(long)]
    pub dry_run: bool,

    /// Do not register the new environment as the project default
    #[arg(long)]
    pub no_pin: bool,
}

/// Arguments for the `remove-venv` command.
#[derive(Debug, Clone, clap::Args)]
pub struct RemoveVenvArgs {
    /// Directory of the environment to delete
    pub venv_dir: PathBuf,

    /// Don't prompt for confirmation
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the `install` command.
#[derive(Debug, Clone, clap::Args)]
pub struct InstallArgs {
    /// Template to install
    pub template: String,

    /// Interpreter of the target environment (defaults to the project or global default)
    #[arg(short, long, value_name = "PATH")]
    pub interpreter: Option<PathBuf>,

    /// Print the command instead of running it
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

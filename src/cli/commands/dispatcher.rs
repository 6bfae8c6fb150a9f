//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandContext`] for the per-invocation stores and collaborators
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::args::{Cli, Commands};
use crate::config::{ConfigPaths, ConfigStore};
use crate::detection::{InterpreterDetector, ProcessVersionProbe, VersionProbe};
use crate::error::Result;
use crate::interpreter::InterpreterRegistry;
use crate::process::{ProcessExecutor, SystemExecutor};
use crate::templates::TemplateManager;
use crate::ui::UserInterface;
use crate::venv::EnvironmentOrchestrator;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `ui` - User interface for displaying output and prompts
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Everything a command needs from the outside world.
///
/// Documents are loaded fresh by each accessor; a command loads what it
/// uses, mutates it and lets the store persist it.
#[derive(Clone)]
pub struct CommandContext {
    working_dir: PathBuf,
    paths: ConfigPaths,
    executor: Arc<dyn ProcessExecutor>,
}

impl CommandContext {
    /// Context backed by the real process executor.
    pub fn new(working_dir: PathBuf, paths: ConfigPaths) -> Self {
        Self::with_executor(working_dir, paths, Arc::new(SystemExecutor))
    }

    /// Context with an injected executor (for testing).
    pub fn with_executor(
        working_dir: PathBuf,
        paths: ConfigPaths,
        executor: Arc<dyn ProcessExecutor>,
    ) -> Self {
        Self {
            working_dir,
            paths,
            executor,
        }
    }

    /// Directory project lookups start from.
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn paths(&self) -> &ConfigPaths {
        &self.paths
    }

    pub fn store(&self) -> ConfigStore {
        ConfigStore::new(self.paths.clone())
    }

    pub fn probe(&self) -> Arc<dyn VersionProbe> {
        Arc::new(ProcessVersionProbe::new(self.executor.clone()))
    }

    /// Load the interpreter registry.
    pub fn registry(&self) -> Result<InterpreterRegistry> {
        InterpreterRegistry::load(self.store(), self.probe())
    }

    /// Load the template store.
    pub fn templates(&self) -> Result<TemplateManager> {
        TemplateManager::load(self.store())
    }

    /// Detector over the real machine.
    pub fn detector(&self) -> InterpreterDetector {
        InterpreterDetector::new(crate::detection::ProbeEnv::from_system(), self.probe())
    }

    /// Orchestrator that echoes venv and pip output in verbose mode.
    pub fn orchestrator(&self, ui: &dyn UserInterface) -> EnvironmentOrchestrator {
        EnvironmentOrchestrator::new(self.executor.clone())
            .with_echo(ui.output_mode().shows_command_output())
    }

    /// Resolve a user-supplied path against the working directory.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.working_dir.join(path)
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    context: CommandContext,
}

impl CommandDispatcher {
    /// Create a new dispatcher over the given context.
    pub fn new(context: CommandContext) -> Self {
        Self { context }
    }

    /// Get the command context.
    pub fn context(&self) -> &CommandContext {
        &self.context
    }

    /// Dispatch and execute a command.
    ///
    /// Routes the CLI subcommand to the appropriate command implementation
    /// and executes it.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let ctx = self.context.clone();
        match &cli.command {
            Commands::Interpreter(args) => {
                let cmd = super::interpreter::InterpreterCommand::new(ctx, args.clone());
                cmd.execute(ui)
            }
            Commands::SetDefaultInterpreter(args) => {
                let cmd = super::set_default::SetDefaultCommand::new(ctx, args.clone());
                cmd.execute(ui)
            }
            Commands::CreateVenv(args) => {
                let cmd = super::venv::CreateVenvCommand::new(ctx, args.clone());
                cmd.execute(ui)
            }
            Commands::CreateFromTemplate(args) => {
                let cmd = super::venv::CreateFromTemplateCommand::new(ctx, args.clone());
                cmd.execute(ui)
            }
            Commands::RemoveVenv(args) => {
                let cmd = super::venv::RemoveVenvCommand::new(ctx, args.clone());
                cmd.execute(ui)
            }
            Commands::Install(args) => {
                let cmd = super::install::InstallCommand::new(ctx, args.clone());
                cmd.execute(ui)
            }
            Commands::Template(args) => {
                let cmd = super::template::TemplateCommand::new(ctx, args.clone());
                cmd.execute(ui)
            }
            Commands::Completions(args) => {
                let cmd = super::completions::CompletionsCommand::new(args.clone());
                cmd.execute(ui)
            }
        }
    }
}

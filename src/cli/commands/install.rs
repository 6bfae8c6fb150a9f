//! `pynstal install` implementation.

use crate::cli::args::InstallArgs;
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandContext, CommandResult};
use super::venv::{print_dry_run_line, resolve_interpreter};

/// The install command implementation.
pub struct InstallCommand {
    ctx: CommandContext,
    args: InstallArgs,
}

impl InstallCommand {
    /// Create a new install command.
    pub fn new(ctx: CommandContext, args: InstallArgs) -> Self {
        Self { ctx, args }
    }
}

impl Command for InstallCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let registry = self.ctx.registry()?;
        let templates = self.ctx.templates()?;
        templates.show(&self.args.template)?;

        let interpreter =
            resolve_interpreter(&self.ctx, &registry, self.args.interpreter.as_deref(), ui)?;
        let orchestrator = self.ctx.orchestrator(ui);
        let name = self.args.template.as_str();

        if self.args.dry_run {
            let report = orchestrator.install(&templates, name, &interpreter.path, true)?;
            match &report.command {
                Some(command) => print_dry_run_line(&command.display(), ui),
                None => ui.message(&format!("Template '{}' has no packages to install", name)),
            }
            return Ok(CommandResult::success());
        }

        let mut spinner = ui.start_spinner(&format!(
            "Installing template '{}' with {}",
            name, interpreter.path
        ));
        match orchestrator.install(&templates, name, &interpreter.path, false) {
            Ok(report) if report.command.is_none() => {
                spinner.finish_success(&format!("Template '{}' has no packages to install", name));
                Ok(CommandResult::success())
            }
            Ok(_) => {
                spinner.finish_success(&format!("Installed template '{}'", name));
                Ok(CommandResult::success())
            }
            Err(e) => {
                spinner.finish_error(&format!("Failed to install template '{}'", name));
                Err(e)
            }
        }
    }
}

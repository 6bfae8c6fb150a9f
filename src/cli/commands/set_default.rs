//! `pynstal set-default-interpreter` implementation.

use crate::cli::args::SetDefaultArgs;
use crate::error::{PynstalError, Result};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandContext, CommandResult};

/// The set-default-interpreter command implementation.
pub struct SetDefaultCommand {
    ctx: CommandContext,
    args: SetDefaultArgs,
}

impl SetDefaultCommand {
    /// Create a new set-default-interpreter command.
    pub fn new(ctx: CommandContext, args: SetDefaultArgs) -> Self {
        Self { ctx, args }
    }
}

impl Command for SetDefaultCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut registry = self.ctx.registry()?;

        if self.args.clear {
            match registry.clear_project_default(self.ctx.working_dir())? {
                Some(root) => ui.success(&format!("Cleared project default for {}", root.display())),
                None => ui.warning("No project configuration found; nothing to clear"),
            }
            return Ok(CommandResult::success());
        }

        let path = self.args.path.as_deref().ok_or_else(|| {
            PynstalError::Other(anyhow::anyhow!("An interpreter path is required"))
        })?;
        let path = self.ctx.resolve_path(path);

        if self.args.project {
            let root = registry.set_project_default(self.ctx.working_dir(), &path)?;
            ui.success(&format!(
                "Set project default interpreter for {}: {}",
                root.display(),
                path.display()
            ));
        } else {
            let path = registry.set_default(&path, self.args.register)?;
            ui.success(&format!("Set default interpreter: {}", path));
        }

        Ok(CommandResult::success())
    }
}

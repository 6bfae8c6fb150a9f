//! Environment commands: `create-venv`, `create-from-template` and `remove-venv`.

use std::path::Path;

use crate::cli::args::{CreateFromTemplateArgs, CreateVenvArgs, EnvironmentFlags, RemoveVenvArgs};
use crate::error::Result;
use crate::interpreter::{DefaultOrigin, InterpreterRegistry, ResolvedInterpreter};
use crate::ui::{Prompt, PromptResult, PromptType, UserInterface};
use crate::venv::{VenvOptions, VenvReport};

use super::dispatcher::{Command, CommandContext, CommandResult};

/// The create-venv command implementation.
pub struct CreateVenvCommand {
    ctx: CommandContext,
    args: CreateVenvArgs,
}

impl CreateVenvCommand {
    /// Create a new create-venv command.
    pub fn new(ctx: CommandContext, args: CreateVenvArgs) -> Self {
        Self { ctx, args }
    }
}

impl Command for CreateVenvCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut registry = self.ctx.registry()?;
        let interpreter =
            resolve_interpreter(&self.ctx, &registry, self.args.env.interpreter.as_deref(), ui)?;
        let target = self.ctx.resolve_path(&self.args.venv_dir);
        let orchestrator = self.ctx.orchestrator(ui);
        let options = venv_options(&self.args.env);

        if options.dry_run {
            let report = orchestrator.create_venv(&mut registry, &interpreter.path, &target, options)?;
            print_dry_run(&report, ui);
            return Ok(CommandResult::success());
        }

        let mut spinner =
            ui.start_spinner(&format!("Creating virtual environment at {}", target.display()));
        match orchestrator.create_venv(&mut registry, &interpreter.path, &target, options) {
            Ok(report) => {
                spinner.finish_success(&format!(
                    "Created virtual environment at {}",
                    report.venv_dir.display()
                ));
                print_created(&report, ui);
                Ok(CommandResult::success())
            }
            Err(e) => {
                spinner.finish_error("Failed to create virtual environment");
                Err(e)
            }
        }
    }
}

/// The create-from-template command implementation.
pub struct CreateFromTemplateCommand {
    ctx: CommandContext,
    args: CreateFromTemplateArgs,
}

impl CreateFromTemplateCommand {
    /// Create a new create-from-template command.
    pub fn new(ctx: CommandContext, args: CreateFromTemplateArgs) -> Self {
        Self { ctx, args }
    }
}

impl Command for CreateFromTemplateCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut registry = self.ctx.registry()?;
        let templates = self.ctx.templates()?;
        // Fail on an unknown template before resolving anything else.
        templates.show(&self.args.template)?;

        let interpreter =
            resolve_interpreter(&self.ctx, &registry, self.args.env.interpreter.as_deref(), ui)?;
        let target = self.ctx.resolve_path(&self.args.venv_dir);
        let orchestrator = self.ctx.orchestrator(ui);
        let options = venv_options(&self.args.env);
        let name = self.args.template.as_str();

        if options.dry_run {
            let report = orchestrator.create_from_template(
                &mut registry,
                &templates,
                name,
                &interpreter.path,
                &target,
                options,
            )?;
            print_dry_run(&report, ui);
            return Ok(CommandResult::success());
        }

        let mut spinner = ui.start_spinner(&format!(
            "Creating {} from template '{}'",
            target.display(),
            name
        ));
        let result = orchestrator.create_from_template(
            &mut registry,
            &templates,
            name,
            &interpreter.path,
            &target,
            options,
        );
        match result {
            Ok(report) => {
                spinner.finish_success(&format!(
                    "Created {} with template '{}'",
                    report.venv_dir.display(),
                    name
                ));
                print_created(&report, ui);
                Ok(CommandResult::success())
            }
            Err(e) => {
                spinner.finish_error(&format!("Failed to set up template '{}'", name));
                Err(e)
            }
        }
    }
}

/// The remove-venv command implementation.
pub struct RemoveVenvCommand {
    ctx: CommandContext,
    args: RemoveVenvArgs,
}

impl RemoveVenvCommand {
    /// Create a new remove-venv command.
    pub fn new(ctx: CommandContext, args: RemoveVenvArgs) -> Self {
        Self { ctx, args }
    }
}

impl Command for RemoveVenvCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut registry = self.ctx.registry()?;
        let orchestrator = self.ctx.orchestrator(ui);
        let target = self.ctx.resolve_path(&self.args.venv_dir);

        // Unmanaged directories fall through to the orchestrator's error.
        if !self.args.yes && ui.is_interactive() && orchestrator.layout(&target).is_managed() {
            let prompt = Prompt {
                key: "remove_venv".to_string(),
                question: format!("Delete the environment at {}?", target.display()),
                prompt_type: PromptType::Confirm,
                default: Some("false".to_string()),
            };

            match ui.prompt(&prompt)? {
                PromptResult::Bool(true) => {}
                _ => {
                    ui.message("Cancelled");
                    return Ok(CommandResult::success());
                }
            }
        }

        let report = orchestrator.remove_venv(&mut registry, &target)?;
        ui.success(&format!("Removed {}", report.venv_dir.display()));
        for path in &report.unregistered {
            ui.message(&format!("  Unregistered {}", path));
        }
        Ok(CommandResult::success())
    }
}

fn venv_options(flags: &EnvironmentFlags) -> VenvOptions {
    VenvOptions {
        dry_run: flags.dry_run,
        pin_project: !flags.no_pin,
    }
}

/// Resolve `--interpreter` or the default, announcing where a default came from.
pub(super) fn resolve_interpreter(
    ctx: &CommandContext,
    registry: &InterpreterRegistry,
    explicit: Option<&Path>,
    ui: &mut dyn UserInterface,
) -> Result<ResolvedInterpreter> {
    let explicit = explicit.map(|p| ctx.resolve_path(p));
    let resolved = registry.resolve(explicit.as_deref(), ctx.working_dir())?;

    if resolved.origin != DefaultOrigin::Explicit && ui.output_mode().shows_status() {
        ui.message(&format!("Using {} ({})", resolved.path, resolved.origin));
    }
    Ok(resolved)
}

pub(super) fn print_dry_run_line(command: &str, ui: &mut dyn UserInterface) {
    ui.message(&format!("DRY RUN: would run: {}", command));
}

fn print_dry_run(report: &VenvReport, ui: &mut dyn UserInterface) {
    for command in &report.commands {
        print_dry_run_line(&command.display(), ui);
    }
}

fn print_created(report: &VenvReport, ui: &mut dyn UserInterface) {
    if let Some(root) = &report.pinned_project {
        ui.message(&format!("Pinned as default interpreter for {}", root.display()));
    }
    if let Some(reason) = &report.pin_error {
        ui.warning(&format!("Environment created but not pinned: {}", reason));
    }
    ui.hint(&format!("Activate it with: {}", report.activation));
}

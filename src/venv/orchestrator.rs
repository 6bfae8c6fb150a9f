//! Drives `venv` and `pip` for environment operations.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::layout::VenvLayout;
use crate::config::{find_project_root, Template};
use crate::detection::Platform;
use crate::error::{PynstalError, Result};
use crate::interpreter::{InterpreterPath, InterpreterRegistry};
use crate::process::{CommandSpec, OutputLine, ProcessExecutor, ProcessOutput};
use crate::templates::TemplateManager;

/// Flags shared by the environment operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VenvOptions {
    /// Report commands instead of running them.
    pub dry_run: bool,
    /// Register the new environment's interpreter and pin it as the
    /// containing project's default.
    pub pin_project: bool,
}

impl Default for VenvOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            pin_project: true,
        }
    }
}

/// What an environment operation did, or would do in a dry run.
#[derive(Debug, Clone)]
pub struct VenvReport {
    pub venv_dir: PathBuf,
    /// Interpreter inside the environment.
    pub python: PathBuf,
    /// Commands run (or that would run), in order.
    pub commands: Vec<CommandSpec>,
    pub dry_run: bool,
    /// Project root that now pins the environment, if any.
    pub pinned_project: Option<PathBuf>,
    /// Why pinning was skipped after the environment was created.
    pub pin_error: Option<String>,
    /// Shell command to activate the environment.
    pub activation: String,
}

/// What an install into an existing environment did.
#[derive(Debug, Clone)]
pub struct InstallReport {
    pub interpreter: InterpreterPath,
    /// `None` when the template has no packages.
    pub command: Option<CommandSpec>,
    pub dry_run: bool,
}

/// What removing an environment cleaned up.
#[derive(Debug, Clone)]
pub struct RemoveReport {
    pub venv_dir: PathBuf,
    /// Registry entries dropped because they lived inside the environment.
    pub unregistered: Vec<InterpreterPath>,
}

/// Creates, fills and removes virtual environments.
///
/// All external work goes through the [`ProcessExecutor`]; the registry is
/// only touched after the external step it depends on has succeeded.
pub struct EnvironmentOrchestrator {
    executor: Arc<dyn ProcessExecutor>,
    platform: Platform,
    echo: bool,
}

impl EnvironmentOrchestrator {
    pub fn new(executor: Arc<dyn ProcessExecutor>) -> Self {
        Self {
            executor,
            platform: Platform::current(),
            echo: false,
        }
    }

    /// Forward venv and pip output to stderr while they run.
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Layout of the environment at `dir` on this orchestrator's platform.
    pub fn layout(&self, dir: &Path) -> VenvLayout {
        VenvLayout::new(dir, self.platform)
    }

    /// Create a virtual environment at `target_dir` with `interpreter`.
    ///
    /// An existing environment at the target is upgraded in place by `venv`.
    pub fn create_venv(
        &self,
        registry: &mut InterpreterRegistry,
        interpreter: &InterpreterPath,
        target_dir: &Path,
        options: VenvOptions,
    ) -> Result<VenvReport> {
        ensure_exists(interpreter)?;
        let layout = self.layout(target_dir);
        let mut report = self.report(&layout, options.dry_run);

        let create = venv_command(interpreter, &layout);
        report.commands.push(create.clone());
        if options.dry_run {
            return Ok(report);
        }

        self.execute(&create, None)?;
        self.pin(registry, &layout, options, &mut report);
        Ok(report)
    }

    /// Create an environment and install a template into it.
    ///
    /// The template is looked up before anything touches the disk. If the
    /// install fails the environment is kept and the error names it.
    pub fn create_from_template(
        &self,
        registry: &mut InterpreterRegistry,
        templates: &TemplateManager,
        template_name: &str,
        interpreter: &InterpreterPath,
        target_dir: &Path,
        options: VenvOptions,
    ) -> Result<VenvReport> {
        let template = templates.show(template_name)?;
        ensure_exists(interpreter)?;
        let layout = self.layout(target_dir);
        let mut report = self.report(&layout, options.dry_run);

        let create = venv_command(interpreter, &layout);
        let install = install_command(&layout.python(), template);
        report.commands.push(create.clone());
        report.commands.extend(install.clone());
        if options.dry_run {
            return Ok(report);
        }

        self.execute(&create, None)?;
        self.pin(registry, &layout, options, &mut report);

        match install {
            Some(install) => {
                self.execute(&install, Some(layout.root()))?;
            }
            None => tracing::debug!("template '{}' has no packages; skipping pip", template_name),
        }
        Ok(report)
    }

    /// Install a template into the environment `interpreter` belongs to.
    pub fn install(
        &self,
        templates: &TemplateManager,
        template_name: &str,
        interpreter: &InterpreterPath,
        dry_run: bool,
    ) -> Result<InstallReport> {
        let template = templates.show(template_name)?;
        ensure_exists(interpreter)?;

        let command = install_command(interpreter.as_path(), template);
        if let (Some(command), false) = (&command, dry_run) {
            self.execute(command, None)?;
        }

        Ok(InstallReport {
            interpreter: interpreter.clone(),
            command,
            dry_run,
        })
    }

    /// Delete a managed environment and every registry reference to it.
    pub fn remove_venv(
        &self,
        registry: &mut InterpreterRegistry,
        target_dir: &Path,
    ) -> Result<RemoveReport> {
        let layout = self.layout(target_dir);
        if !layout.is_managed() {
            return Err(PynstalError::VenvNotFound {
                path: layout.root().to_path_buf(),
            });
        }

        fs::remove_dir_all(layout.root())?;
        tracing::debug!("removed {}", layout.root().display());

        let unregistered = registry.forget_environment(layout.root(), &project_root(&layout))?;
        Ok(RemoveReport {
            venv_dir: layout.root().to_path_buf(),
            unregistered,
        })
    }

    fn report(&self, layout: &VenvLayout, dry_run: bool) -> VenvReport {
        VenvReport {
            venv_dir: layout.root().to_path_buf(),
            python: layout.python(),
            commands: Vec::new(),
            dry_run,
            pinned_project: None,
            pin_error: None,
            activation: layout.activation_command(),
        }
    }

    /// Pin the new environment as its project's default.
    ///
    /// The environment already exists at this point, so a failure is
    /// recorded on the report instead of aborting the operation.
    fn pin(
        &self,
        registry: &mut InterpreterRegistry,
        layout: &VenvLayout,
        options: VenvOptions,
        report: &mut VenvReport,
    ) {
        if !options.pin_project {
            return;
        }
        let root = project_root(layout);
        match registry.pin_project_default(&root, &InterpreterPath::new(layout.python())) {
            Ok(()) => report.pinned_project = Some(root),
            Err(e) => {
                tracing::warn!("could not pin {}: {}", layout.root().display(), e);
                report.pin_error = Some(e.to_string());
            }
        }
    }

    /// Run `spec`, mapping a non-zero exit to `ExternalProcessFailed`.
    fn execute(&self, spec: &CommandSpec, kept_venv: Option<&Path>) -> Result<ProcessOutput> {
        let output = if self.echo {
            self.executor.run_streaming(
                spec,
                Box::new(|line: OutputLine| match line {
                    OutputLine::Stdout(l) | OutputLine::Stderr(l) => eprintln!("  {}", l),
                }),
            )?
        } else {
            self.executor.run(spec)?
        };

        if output.success {
            return Ok(output);
        }

        Err(PynstalError::ExternalProcessFailed {
            command: spec.display(),
            code: output.exit_code,
            stderr: output.stderr,
            venv: kept_venv.map(Path::to_path_buf),
        })
    }
}

fn ensure_exists(interpreter: &InterpreterPath) -> Result<()> {
    if interpreter.exists() {
        Ok(())
    } else {
        Err(PynstalError::InterpreterNotFound {
            path: interpreter.as_path().to_path_buf(),
        })
    }
}

/// Project that owns the environment: nearest ancestor of its parent with a
/// project file, else the parent itself.
fn project_root(layout: &VenvLayout) -> PathBuf {
    let parent = layout.parent();
    find_project_root(&parent).unwrap_or(parent)
}

fn venv_command(interpreter: &InterpreterPath, layout: &VenvLayout) -> CommandSpec {
    CommandSpec::new(interpreter.as_path())
        .args(["-m", "venv"])
        .arg(layout.root().to_string_lossy())
}

fn install_command(python: &Path, template: &Template) -> Option<CommandSpec> {
    if template.packages.is_empty() {
        return None;
    }
    Some(
        CommandSpec::new(python)
            .args(["-m", "pip", "install"])
            .args(template.packages.iter().cloned())
            .args(template.args.iter().cloned()),
    )
}

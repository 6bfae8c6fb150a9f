//! Interpreter command implementation.
//!
//! Provides `pynstal interpreter list`, `detect`, `add` and `remove`.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use serde::Serialize;

use crate::detection::{DetectedInterpreter, InterpreterSource};
use crate::error::{PynstalError, Result};
use crate::interpreter::{InterpreterPath, InterpreterRegistry, MergeMode, MergeReport};
use crate::ui::{Prompt, PromptOption, PromptType, PynstalTheme, Table, UserInterface};

use super::dispatcher::{Command, CommandContext, CommandResult};

/// Prompt key for the detection multi-select (`PYNSTAL_PROMPT_SELECT_INTERPRETERS`).
pub const SELECT_PROMPT_KEY: &str = "select_interpreters";

/// Arguments for the interpreter command.
#[derive(Debug, Clone, Args)]
pub struct InterpreterArgs {
    #[command(subcommand)]
    pub command: InterpreterSubcommand,
}

/// Interpreter subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum InterpreterSubcommand {
    /// List registered interpreters.
    List {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Scan the machine for Python interpreters.
    Detect {
        /// Choose which detected interpreters to register.
        #[arg(long, conflicts_with = "add_all")]
        add: bool,
        /// Register every detected interpreter.
        #[arg(long)]
        add_all: bool,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Register an interpreter.
    Add {
        /// Path to the Python executable.
        path: PathBuf,
    },
    /// Unregister an interpreter.
    Remove {
        /// Path to the Python executable.
        path: PathBuf,
    },
}

/// The interpreter command implementation.
pub struct InterpreterCommand {
    ctx: CommandContext,
    args: InterpreterArgs,
}

impl InterpreterCommand {
    /// Create a new interpreter command.
    pub fn new(ctx: CommandContext, args: InterpreterArgs) -> Self {
        Self { ctx, args }
    }
}

impl Command for InterpreterCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut registry = self.ctx.registry()?;

        match &self.args.command {
            InterpreterSubcommand::List { json } => self.list(&registry, *json, ui)?,
            InterpreterSubcommand::Detect { add, add_all, json } => {
                let mode = if *add_all {
                    DetectMode::AddAll
                } else if *add {
                    DetectMode::Select
                } else {
                    DetectMode::List
                };
                self.detect(&mut registry, mode, *json, ui)?
            }
            InterpreterSubcommand::Add { path } => {
                let added = registry.add(&self.ctx.resolve_path(path))?;
                ui.success(&format!(
                    "Added interpreter {} (Python {})",
                    added.path, added.version
                ));
                if registry.global_default().is_none() {
                    ui.hint(&format!(
                        "Make it the default with `pynstal set-default-interpreter {}`",
                        added.path
                    ));
                }
            }
            InterpreterSubcommand::Remove { path } => {
                let path = self.ctx.resolve_path(path);
                let was_default = registry.global_default() == Some(&InterpreterPath::new(&path));
                let removed = registry.remove(&path)?;
                ui.success(&format!("Removed interpreter {}", removed));
                if was_default {
                    ui.warning("It was the global default; no global default is set now");
                }
            }
        }

        Ok(CommandResult::success())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DetectMode {
    List,
    AddAll,
    Select,
}

#[derive(Serialize)]
struct ListJson<'a> {
    interpreters: &'a [InterpreterPath],
    global_default: Option<&'a InterpreterPath>,
    resolved_default: Option<ResolvedJson>,
}

#[derive(Serialize)]
struct ResolvedJson {
    path: InterpreterPath,
    origin: String,
}

#[derive(Serialize)]
struct DetectedJson<'a> {
    path: &'a InterpreterPath,
    version: &'a str,
    source: InterpreterSource,
    registered: bool,
    added: bool,
}

impl InterpreterCommand {
    fn list(
        &self,
        registry: &InterpreterRegistry,
        json: bool,
        ui: &mut dyn UserInterface,
    ) -> Result<()> {
        let resolved = match registry.resolve_default(self.ctx.working_dir()) {
            Ok(resolved) => Some(resolved),
            Err(PynstalError::NoDefaultAvailable) => None,
            Err(e) => return Err(e),
        };

        if json {
            let doc = ListJson {
                interpreters: registry.interpreters(),
                global_default: registry.global_default(),
                resolved_default: resolved.map(|r| ResolvedJson {
                    origin: r.origin.to_string(),
                    path: r.path,
                }),
            };
            ui.message(&to_json(&doc)?);
            return Ok(());
        }

        let theme = PynstalTheme::detect();
        if registry.interpreters().is_empty() {
            ui.message("No interpreters registered.");
            ui.hint("Run `pynstal interpreter detect --add` to find installed interpreters");
            return Ok(());
        }

        ui.message(&format!("{}", theme.highlight.apply_to("Interpreters:")));
        for path in registry.interpreters() {
            let marker = if registry.global_default() == Some(path) {
                format!(" {}", theme.dim.apply_to("(global default)"))
            } else {
                String::new()
            };
            ui.message(&format!("  {}{}", path, marker));
        }

        match resolved {
            Some(r) => ui.message(&format!(
                "\nDefault here: {} {}",
                r.path,
                theme.dim.apply_to(format!("[{}]", r.origin))
            )),
            None => ui.message(&format!("\nDefault here: {}", theme.dim.apply_to("(none)"))),
        }
        Ok(())
    }

    fn detect(
        &self,
        registry: &mut InterpreterRegistry,
        mode: DetectMode,
        json: bool,
        ui: &mut dyn UserInterface,
    ) -> Result<()> {
        let detector = self.ctx.detector();
        let mut spinner = (!json).then(|| ui.start_spinner("Scanning for Python interpreters..."));

        let report = match mode {
            DetectMode::List => registry.detect_and_merge(&detector, MergeMode::List)?,
            DetectMode::AddAll => registry.detect_and_merge(&detector, MergeMode::AddAll)?,
            DetectMode::Select => {
                let mut select = |fresh: &[DetectedInterpreter]| {
                    if let Some(mut s) = spinner.take() {
                        s.finish_success(&format!("Found {} new interpreter(s)", fresh.len()));
                    }
                    select_interpreters(&mut *ui, fresh)
                };
                registry.detect_and_merge(&detector, MergeMode::Interactive(&mut select))?
            }
        };

        if let Some(mut s) = spinner {
            s.finish_success(&format!("Found {} interpreter(s)", report.candidates.len()));
        }

        if json {
            let rows: Vec<DetectedJson<'_>> = report
                .candidates
                .iter()
                .map(|c| DetectedJson {
                    path: &c.path,
                    version: &c.version,
                    source: c.source,
                    registered: report.already_registered.contains(&c.path),
                    added: report.added.contains(&c.path),
                })
                .collect();
            ui.message(&to_json(&rows)?);
            return Ok(());
        }

        render_detected(&report, ui);
        Ok(())
    }
}

fn render_detected(report: &MergeReport, ui: &mut dyn UserInterface) {
    if report.candidates.is_empty() {
        ui.message("No Python installations found.");
        return;
    }

    let mut table = Table::new(vec!["Path", "Version", "Source", "Status"]);
    for c in &report.candidates {
        let status = if report.added.contains(&c.path) {
            "added"
        } else if report.already_registered.contains(&c.path) {
            "registered"
        } else {
            "new"
        };
        table.add_row(&[
            c.path.to_string(),
            c.version.clone(),
            c.source.to_string(),
            status.to_string(),
        ]);
    }
    ui.message(&table.render());

    let fresh = report.candidates.len() - report.already_registered.len() - report.added.len();
    if !report.added.is_empty() {
        ui.success(&format!("Registered {} interpreter(s)", report.added.len()));
    } else if fresh > 0 {
        ui.hint("Run `pynstal interpreter detect --add` or `--add-all` to register them");
    }
}

/// Ask which of the unregistered interpreters to add.
///
/// Non-interactive runs select nothing unless
/// `PYNSTAL_PROMPT_SELECT_INTERPRETERS` lists paths.
fn select_interpreters(
    ui: &mut dyn UserInterface,
    fresh: &[DetectedInterpreter],
) -> Result<Vec<InterpreterPath>> {
    let prompt = Prompt {
        key: SELECT_PROMPT_KEY.to_string(),
        question: "Register which interpreters?".to_string(),
        prompt_type: PromptType::MultiSelect {
            options: fresh
                .iter()
                .map(|c| PromptOption {
                    label: c.label(),
                    value: c.path.to_string(),
                })
                .collect(),
        },
        default: Some(String::new()),
    };

    let picked = ui.prompt(&prompt)?.into_strings();
    Ok(picked.into_iter().map(InterpreterPath::new).collect())
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| PynstalError::Other(e.into()))
}

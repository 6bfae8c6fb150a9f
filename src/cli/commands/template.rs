//! Template command implementation.
//!
//! Provides `pynstal template list`, `show`, `create`, `add-pkg`,
//! `add-pkg-complex`, `remove-pkg` and `remove`.

use std::collections::BTreeMap;

use clap::{Args, Subcommand};

use crate::error::{PynstalError, Result};
use crate::templates::{split_words, Template, TemplateManager};
use crate::ui::{PynstalTheme, UserInterface};

use super::dispatcher::{Command, CommandContext, CommandResult};

/// Arguments for the template command.
#[derive(Debug, Clone, Args)]
pub struct TemplateArgs {
    #[command(subcommand)]
    pub command: TemplateSubcommand,
}

/// Template subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum TemplateSubcommand {
    /// List all templates.
    List {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Show one template.
    Show {
        name: String,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Create a template.
    #[command(visible_alias = "add", alias = "add-complex")]
    Create {
        name: String,
        /// Packages, in install order.
        #[arg(required = true, num_args = 1..)]
        packages: Vec<String>,
        /// Extra pip arguments, e.g. "--index-url https://...".
        #[arg(long, alias = "args-str", allow_hyphen_values = true, value_name = "ARGS")]
        args: Option<String>,
    },
    /// Append packages to a template.
    AddPkg {
        name: String,
        #[arg(required = true, num_args = 1..)]
        packages: Vec<String>,
    },
    /// Append packages and extra pip arguments to a template.
    AddPkgComplex {
        name: String,
        #[arg(required = true, num_args = 1..)]
        packages: Vec<String>,
        /// Extra pip arguments appended to the existing ones.
        #[arg(long, required = true, allow_hyphen_values = true, value_name = "ARGS")]
        args: String,
    },
    /// Remove packages from a template.
    RemovePkg {
        name: String,
        #[arg(required = true, num_args = 1..)]
        packages: Vec<String>,
        /// Allow the template to end up with no packages.
        #[arg(long)]
        allow_empty: bool,
    },
    /// Delete a template.
    Remove { name: String },
}

/// The template command implementation.
pub struct TemplateCommand {
    ctx: CommandContext,
    args: TemplateArgs,
}

impl TemplateCommand {
    /// Create a new template command.
    pub fn new(ctx: CommandContext, args: TemplateArgs) -> Self {
        Self { ctx, args }
    }
}

impl Command for TemplateCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let mut manager = self.ctx.templates()?;

        match &self.args.command {
            TemplateSubcommand::List { json } => list_templates(&manager, *json, ui)?,
            TemplateSubcommand::Show { name, json } => {
                let template = manager.show(name)?;
                if *json {
                    ui.message(&to_json(template)?);
                } else {
                    render_template(name, template, ui);
                }
            }
            TemplateSubcommand::Create {
                name,
                packages,
                args,
            } => {
                let args = args.as_deref().map(|a| split_words(&[a])).unwrap_or_default();
                let template = manager.create(name, split_words(packages), args)?;
                ui.success(&format!(
                    "Template '{}' added with packages: {}",
                    name.trim(),
                    template.packages.join(", ")
                ));
                if template.has_args() {
                    ui.message(&format!("  Install args: {}", template.args.join(" ")));
                }
            }
            TemplateSubcommand::AddPkg { name, packages } => {
                let added = split_words(packages);
                manager.add_packages(name, added.clone())?;
                ui.success(&format!("Added {} to '{}'", added.join(", "), name));
            }
            TemplateSubcommand::AddPkgComplex {
                name,
                packages,
                args,
            } => {
                let added = split_words(packages);
                let template =
                    manager.add_packages_with_args(name, added.clone(), split_words(&[args]))?;
                ui.success(&format!("Added {} to '{}'", added.join(", "), name));
                ui.message(&format!("  Install args: {}", template.args.join(" ")));
            }
            TemplateSubcommand::RemovePkg {
                name,
                packages,
                allow_empty,
            } => {
                let removed = split_words(packages);
                let before = manager.show(name)?.packages.len();
                let template = manager.remove_packages(name, &removed, *allow_empty)?;
                if template.packages.len() == before {
                    ui.warning(&format!(
                        "None of {} are in template '{}'",
                        removed.join(", "),
                        name
                    ));
                } else {
                    ui.success(&format!("Removed {} from '{}'", removed.join(", "), name));
                }
            }
            TemplateSubcommand::Remove { name } => {
                manager.remove(name)?;
                ui.success(&format!("Template '{}' removed", name));
            }
        }

        Ok(CommandResult::success())
    }
}

fn list_templates(manager: &TemplateManager, json: bool, ui: &mut dyn UserInterface) -> Result<()> {
    if json {
        let all: BTreeMap<&str, &Template> = manager.list().collect();
        ui.message(&to_json(&all)?);
        return Ok(());
    }

    if manager.is_empty() {
        ui.message("No templates defined.");
        ui.hint("Create one with `pynstal template create <name> <packages>...`");
        return Ok(());
    }

    let theme = PynstalTheme::detect();
    ui.message(&format!("{}", theme.highlight.apply_to("Templates:")));
    for (name, template) in manager.list() {
        let args = if template.has_args() {
            format!(" {}", theme.dim.apply_to(format!("(args: {})", template.args.join(" "))))
        } else {
            String::new()
        };
        ui.message(&format!(
            "  {}: {}{}",
            theme.highlight.apply_to(name),
            template.packages.join(", "),
            args
        ));
    }
    Ok(())
}

fn render_template(name: &str, template: &Template, ui: &mut dyn UserInterface) {
    let theme = PynstalTheme::detect();
    ui.message(&format!("{}", theme.highlight.apply_to(format!("Template '{}':", name))));
    if template.packages.is_empty() {
        ui.message(&format!("  {}", theme.dim.apply_to("(no packages)")));
    }
    for package in &template.packages {
        ui.message(&format!("  {}", package));
    }
    if template.has_args() {
        ui.message(&format!(
            "  {} {}",
            theme.dim.apply_to("args:"),
            theme.command.apply_to(template.args.join(" "))
        ));
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| PynstalError::Other(e.into()))
}

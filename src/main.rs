//! pynstal CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use pynstal::cli::{Cli, CommandContext, CommandDispatcher};
use pynstal::config::ConfigPaths;
use pynstal::interpreter::absolute_path;
use pynstal::ui::{create_ui, OutputMode, UserInterface};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is WARN
///
/// Logs go to stderr so `--json` output on stdout stays parseable.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("pynstal=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pynstal=warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn build_context(cli: &Cli) -> pynstal::Result<CommandContext> {
    let working_dir = match &cli.directory {
        Some(dir) => absolute_path(dir),
        None => std::env::current_dir()?,
    };
    let paths = ConfigPaths::discover(cli.config_dir.as_deref().map(absolute_path).as_deref())?;
    tracing::debug!(
        "working dir {}, config dir {}",
        working_dir.display(),
        paths.global_dir().display()
    );
    Ok(CommandContext::new(working_dir, paths))
}

fn run(cli: &Cli, ui: &mut dyn UserInterface) -> pynstal::Result<i32> {
    let dispatcher = CommandDispatcher::new(build_context(cli)?);
    let result = dispatcher.dispatch(cli, ui)?;
    Ok(result.exit_code)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("pynstal starting with args: {:?}", cli);

    let output_mode = OutputMode::from_flags(cli.verbose, cli.quiet);

    // Handle --no-color
    if cli.no_color {
        std::env::set_var("NO_COLOR", "1");
    }

    let mut ui = create_ui(!cli.non_interactive, output_mode);

    match run(&cli, ui.as_mut()) {
        Ok(code) => ExitCode::from(code.clamp(0, 255) as u8),
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            ExitCode::from(1)
        }
    }
}

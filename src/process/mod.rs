//! Process execution for interpreter, venv and pip invocations.
//!
//! All external programs are launched directly (no intermediate shell) so
//! interpreter paths with spaces survive untouched. The [`ProcessExecutor`]
//! trait is the seam tests use to fake venv/pip runs.

pub mod command;

pub use command::{
    CommandSpec, OutputCallback, OutputLine, ProcessExecutor, ProcessOutput, SystemExecutor,
};

#[cfg(all(test, unix))]
pub(crate) mod fake;

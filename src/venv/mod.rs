//! Virtual environment orchestration.
//!
//! [`EnvironmentOrchestrator`] builds the `venv` and `pip` command lines,
//! runs them through a [`ProcessExecutor`](crate::process::ProcessExecutor)
//! and keeps the interpreter registry in step with what exists on disk.

pub mod layout;
pub mod orchestrator;

pub use layout::{VenvLayout, VENV_MARKER};
pub use orchestrator::{
    EnvironmentOrchestrator, InstallReport, RemoveReport, VenvOptions, VenvReport,
};

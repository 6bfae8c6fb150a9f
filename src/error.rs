//! Error types for pynstal operations.
//!
//! This module defines [`PynstalError`], the primary error type used
//! throughout the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `PynstalError` for domain errors that surface to the user
//! - Use `anyhow::Error` (via `PynstalError::Other`) for unexpected errors
//! - Every error renders as a single actionable line; the dispatcher turns
//!   it into a non-zero exit code

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for pynstal operations.
#[derive(Debug, Error)]
pub enum PynstalError {
    /// Path is not an executable Python interpreter.
    #[error("Not a usable Python interpreter: {path} ({reason})")]
    InvalidInterpreter { path: PathBuf, reason: String },

    /// Interpreter is already in the registry.
    #[error("Interpreter already registered: {path}")]
    AlreadyRegistered { path: PathBuf },

    /// Interpreter is not in the registry.
    #[error("Interpreter not registered: {path}")]
    NotFound { path: PathBuf },

    /// Referenced template does not exist.
    #[error("Template '{name}' not found")]
    TemplateNotFound { name: String },

    /// Directory is not a managed virtual environment.
    #[error("No virtual environment found at {path}")]
    VenvNotFound { path: PathBuf },

    /// Template name is already taken.
    #[error("Template '{name}' already exists")]
    DuplicateTemplate { name: String },

    /// Template would end up without packages.
    #[error("Template '{name}' must contain at least one package")]
    EmptyTemplate { name: String },

    /// No interpreter given and no default configured.
    #[error("No interpreter specified and no default interpreter configured (use --interpreter or set-default-interpreter)")]
    NoDefaultAvailable,

    /// Interpreter path no longer exists on disk.
    #[error("Interpreter executable not found: {path}")]
    InterpreterNotFound { path: PathBuf },

    /// venv or pip exited unsuccessfully.
    #[error("{}", external_failure_message(command, *code, stderr, venv.as_deref()))]
    ExternalProcessFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
        /// Environment left in place by a partially applied operation.
        venv: Option<PathBuf>,
    },

    /// Failed to parse a stored JSON document.
    #[error("Failed to parse {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn external_failure_message(
    command: &str,
    code: Option<i32>,
    stderr: &str,
    venv: Option<&std::path::Path>,
) -> String {
    let mut msg = match code {
        Some(code) => format!("Command failed with exit code {}: {}", code, command),
        None => format!("Command failed: {}", command),
    };
    let detail = stderr.trim();
    if !detail.is_empty() {
        let last = detail.lines().last().unwrap_or(detail);
        msg.push_str(&format!(" ({})", last.trim()));
    }
    if let Some(venv) = venv {
        msg.push_str(&format!(
            "; the environment at {} was kept, re-run `pynstal install` to retry",
            venv.display()
        ));
    }
    msg
}

/// Result type alias for pynstal operations.
pub type Result<T> = std::result::Result<T, PynstalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_interpreter_displays_path_and_reason() {
        let err = PynstalError::InvalidInterpreter {
            path: PathBuf::from("/usr/bin/ruby"),
            reason: "version query failed".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/usr/bin/ruby"));
        assert!(msg.contains("version query failed"));
    }

    #[test]
    fn template_not_found_displays_name() {
        let err = PynstalError::TemplateNotFound {
            name: "datasci".into(),
        };
        assert!(err.to_string().contains("datasci"));
    }

    #[test]
    fn external_failure_displays_command_and_code() {
        let err = PynstalError::ExternalProcessFailed {
            command: "python -m pip install numpy".into(),
            code: Some(1),
            stderr: String::new(),
            venv: None,
        };
        let msg = err.to_string();
        assert!(msg.contains("python -m pip install numpy"));
        assert!(msg.contains("exit code 1"));
    }

    #[test]
    fn external_failure_keeps_last_stderr_line_on_one_line() {
        let err = PynstalError::ExternalProcessFailed {
            command: "pip install nope".into(),
            code: Some(1),
            stderr: "Collecting nope\nERROR: No matching distribution found for nope\n".into(),
            venv: None,
        };
        let msg = err.to_string();
        assert!(msg.contains("No matching distribution"));
        assert!(!msg.contains('\n'));
    }

    #[test]
    fn external_failure_mentions_kept_venv() {
        let err = PynstalError::ExternalProcessFailed {
            command: "pip install torch".into(),
            code: None,
            stderr: String::new(),
            venv: Some(PathBuf::from("/work/.venv")),
        };
        let msg = err.to_string();
        assert!(msg.contains("/work/.venv"));
        assert!(msg.contains("pynstal install"));
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: PynstalError = io_err.into();
        assert!(matches!(err, PynstalError::Io(_)));
    }

    #[test]
    fn no_default_is_actionable() {
        assert!(PynstalError::NoDefaultAvailable
            .to_string()
            .contains("--interpreter"));
    }
}

//! Detection strategy trait and result types.

use serde::Serialize;
use std::path::PathBuf;

use super::env::ProbeEnv;
use crate::interpreter::InterpreterPath;

/// Host platform family; selects which strategies run and which names match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Posix,
    Windows,
}

impl Platform {
    /// The platform this binary was built for.
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Posix
        }
    }

    /// Whether path comparison ignores case.
    pub fn case_insensitive(&self) -> bool {
        matches!(self, Platform::Windows)
    }
}

/// Where a candidate interpreter was found.
///
/// Declaration order is the output grouping order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpreterSource {
    System,
    Pyenv,
    Conda,
    Path,
}

impl std::fmt::Display for InterpreterSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InterpreterSource::System => write!(f, "system"),
            InterpreterSource::Pyenv => write!(f, "pyenv"),
            InterpreterSource::Conda => write!(f, "conda"),
            InterpreterSource::Path => write!(f, "path"),
        }
    }
}

/// A validated interpreter found on the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectedInterpreter {
    /// Interpreter executable.
    pub path: InterpreterPath,

    /// Version reported by `--version`, e.g. `3.12.4`.
    pub version: String,

    /// Strategy that produced it.
    pub source: InterpreterSource,
}

impl DetectedInterpreter {
    /// One-line label for menus and listings.
    pub fn label(&self) -> String {
        format!("{} (Python {}, {})", self.path, self.version, self.source)
    }
}

/// A platform-specific way of finding candidate interpreter files.
///
/// Strategies only list plausible files; validation and deduplication
/// happen in [`InterpreterDetector`](super::InterpreterDetector).
pub trait CandidateStrategy {
    /// Source tag attached to everything this strategy finds.
    fn source(&self) -> InterpreterSource;

    /// Candidate executable paths, in any order.
    fn candidates(&self, env: &ProbeEnv) -> Vec<PathBuf>;
}

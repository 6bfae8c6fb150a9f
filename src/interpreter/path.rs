//! Interpreter path identity.

use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::path::{Component, Path, PathBuf};

/// Absolute, lexically normalised path to a Python executable.
///
/// Symlinks are deliberately left unresolved: a venv's `bin/python` is a
/// symlink to its base interpreter but behaves differently, so both must
/// remain distinct registry entries. Comparison is case-insensitive on
/// Windows.
#[derive(Debug, Clone)]
pub struct InterpreterPath {
    path: PathBuf,
}

impl InterpreterPath {
    /// Build from any path; relative paths resolve against the current directory.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: absolute_path(path.as_ref()),
        }
    }

    /// The normalised path.
    pub fn as_path(&self) -> &Path {
        &self.path
    }

    /// Whether the executable is still present on disk.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Key used for equality and ordering.
    pub fn key(&self) -> String {
        let s = self.path.to_string_lossy();
        if cfg!(windows) {
            s.to_lowercase()
        } else {
            s.to_string()
        }
    }

    /// Whether this interpreter lives inside `dir`.
    pub fn is_inside(&self, dir: &Path) -> bool {
        let dir = InterpreterPath::new(dir);
        let (me, dir) = (PathBuf::from(self.key()), PathBuf::from(dir.key()));
        me.starts_with(&dir) && me != dir
    }
}

/// Make `path` absolute against the current directory and normalise it
/// lexically. Symlinks are not followed.
pub fn absolute_path(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
    };
    normalize(&absolute)
}

/// Remove `.` and resolve `..` components without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !matches!(
                    out.components().next_back(),
                    None | Some(Component::RootDir) | Some(Component::Prefix(_))
                ) {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

impl PartialEq for InterpreterPath {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for InterpreterPath {}

impl Hash for InterpreterPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for InterpreterPath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for InterpreterPath {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl std::fmt::Display for InterpreterPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

impl AsRef<Path> for InterpreterPath {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

impl Serialize for InterpreterPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.path.to_string_lossy())
    }
}

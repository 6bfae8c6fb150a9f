//! In-memory interpreter registry document.

use std::path::Path;

use super::path::InterpreterPath;
use crate::config::InterpretersFile;

/// Registered interpreters plus the global default.
///
/// Every mutation keeps two invariants: no path appears twice, and the
/// default is either unset or one of the registered paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterpreterDocument {
    interpreters: Vec<InterpreterPath>,
    global_default: Option<InterpreterPath>,
}

impl InterpreterDocument {
    /// Build from the on-disk form, repairing anything that breaks the invariants.
    pub fn from_file(file: &InterpretersFile) -> Self {
        let mut doc = Self::default();

        for raw in &file.interpreters {
            if raw.trim().is_empty() {
                continue;
            }
            let path = InterpreterPath::new(raw);
            if !doc.insert(path.clone()) {
                tracing::warn!("dropping duplicate registry entry {}", path);
            }
        }

        if let Some(raw) = file.global_interpreter.as_deref() {
            let path = InterpreterPath::new(raw);
            if doc.contains(&path) {
                doc.global_default = Some(path);
            } else {
                tracing::warn!("clearing global default {} which is not registered", path);
            }
        }

        doc
    }

    /// Convert to the on-disk form.
    pub fn to_file(&self) -> InterpretersFile {
        InterpretersFile {
            interpreters: self.interpreters.iter().map(|p| p.to_string()).collect(),
            global_interpreter: self.global_default.as_ref().map(|p| p.to_string()),
        }
    }

    pub fn interpreters(&self) -> &[InterpreterPath] {
        &self.interpreters
    }

    pub fn global_default(&self) -> Option<&InterpreterPath> {
        self.global_default.as_ref()
    }

    pub fn contains(&self, path: &InterpreterPath) -> bool {
        self.interpreters.contains(path)
    }

    /// Append `path`. Returns `false` when it was already present.
    pub fn insert(&mut self, path: InterpreterPath) -> bool {
        if self.contains(&path) {
            return false;
        }
        self.interpreters.push(path);
        true
    }

    /// Remove `path`, clearing the default if it pointed there.
    ///
    /// Returns `false` when the path was not registered.
    pub fn remove(&mut self, path: &InterpreterPath) -> bool {
        let before = self.interpreters.len();
        self.interpreters.retain(|p| p != path);
        if self.interpreters.len() == before {
            return false;
        }
        if self.global_default.as_ref() == Some(path) {
            self.global_default = None;
        }
        true
    }

    /// Point the default at a registered path. Returns `false` if unregistered.
    pub fn set_default(&mut self, path: &InterpreterPath) -> bool {
        if !self.contains(path) {
            return false;
        }
        self.global_default = Some(path.clone());
        true
    }

    /// Remove every interpreter living under `dir`. Returns what was removed.
    pub fn remove_inside(&mut self, dir: &Path) -> Vec<InterpreterPath> {
        let doomed: Vec<_> = self
            .interpreters
            .iter()
            .filter(|p| p.is_inside(dir))
            .cloned()
            .collect();
        for path in &doomed {
            self.remove(path);
        }
        doomed
    }
}

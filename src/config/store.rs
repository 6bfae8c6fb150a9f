//! JSON document persistence.
//!
//! Documents are loaded whole, mutated in memory and rewritten whole.
//! Missing files read as empty documents; nothing touches the disk until
//! the first save.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use super::paths::{find_project_root, ConfigPaths};
use super::schema::{InterpretersFile, ProjectFile, TemplatesFile};
use crate::error::{PynstalError, Result};

/// Reads and writes the global and project-local documents.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    paths: ConfigPaths,
}

impl ConfigStore {
    /// Create a store over the given paths.
    pub fn new(paths: ConfigPaths) -> Self {
        Self { paths }
    }

    /// Paths this store reads from.
    pub fn paths(&self) -> &ConfigPaths {
        &self.paths
    }

    /// Load the interpreter registry document.
    pub fn load_interpreters(&self) -> Result<InterpretersFile> {
        read_json(&self.paths.interpreters_file())
    }

    /// Persist the interpreter registry document.
    pub fn save_interpreters(&self, file: &InterpretersFile) -> Result<()> {
        write_json_atomic(&self.paths.interpreters_file(), file)
    }

    /// Load the template store document.
    pub fn load_templates(&self) -> Result<TemplatesFile> {
        read_json(&self.paths.templates_file())
    }

    /// Persist the template store document.
    pub fn save_templates(&self, file: &TemplatesFile) -> Result<()> {
        write_json_atomic(&self.paths.templates_file(), file)
    }

    /// Load the project document stored directly in `project_root`.
    pub fn load_project(&self, project_root: &Path) -> Result<ProjectFile> {
        read_json(&ConfigPaths::project_file(project_root))
    }

    /// Persist the project document for `project_root`.
    pub fn save_project(&self, project_root: &Path, file: &ProjectFile) -> Result<()> {
        write_json_atomic(&ConfigPaths::project_file(project_root), file)
    }

    /// Find the project governing `working_dir` and load its document.
    ///
    /// Returns `None` when no ancestor of `working_dir` has a project file.
    pub fn project_for(&self, working_dir: &Path) -> Result<Option<(PathBuf, ProjectFile)>> {
        match find_project_root(working_dir) {
            Some(root) => {
                let file = self.load_project(&root)?;
                Ok(Some((root, file)))
            }
            None => Ok(None),
        }
    }
}

/// Read a JSON document, returning the default when the file is absent.
pub fn read_json<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(T::default()),
        Err(e) => return Err(e.into()),
    };

    if content.trim().is_empty() {
        return Ok(T::default());
    }

    serde_json::from_str(&content).map_err(|e| PynstalError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Write a JSON document atomically.
///
/// Uses the write-to-temp-then-rename pattern so a crash mid-write never
/// leaves a truncated document behind.
pub fn write_json_atomic<T>(path: &Path, value: &T) -> Result<()>
where
    T: Serialize,
{
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut content = serde_json::to_string_pretty(value).map_err(|e| {
        PynstalError::Other(anyhow::anyhow!(
            "Failed to serialize {}: {}",
            path.display(),
            e
        ))
    })?;
    content.push('\n');

    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, &content)?;
    fs::rename(&temp_path, path)?;
    tracing::debug!("wrote {}", path.display());

    Ok(())
}

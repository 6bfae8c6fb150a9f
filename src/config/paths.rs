//! Configuration file discovery.
//!
//! Global documents live in one directory (`~/.pynstal` unless overridden);
//! project documents live in `<project>/.pynstal/project.json`.

use crate::error::{PynstalError, Result};
use std::path::{Path, PathBuf};

/// Name of the global and project-local configuration directories.
pub const CONFIG_DIR_NAME: &str = ".pynstal";

/// Global interpreter registry file name.
pub const INTERPRETERS_FILE: &str = "interpreters.json";

/// Global template store file name.
pub const TEMPLATES_FILE: &str = "templates.json";

/// Project-local configuration file name.
pub const PROJECT_FILE: &str = "project.json";

/// Locations of the global configuration documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    global_dir: PathBuf,
}

impl ConfigPaths {
    /// Use an explicit global directory.
    pub fn new(global_dir: impl Into<PathBuf>) -> Self {
        Self {
            global_dir: global_dir.into(),
        }
    }

    /// Resolve the global directory: the override if given, else `~/.pynstal`.
    pub fn discover(global_override: Option<&Path>) -> Result<Self> {
        if let Some(dir) = global_override {
            return Ok(Self::new(dir));
        }

        let home = dirs::home_dir().ok_or_else(|| {
            PynstalError::Other(anyhow::anyhow!(
                "Cannot determine home directory; pass --config-dir or set PYNSTAL_HOME"
            ))
        })?;
        Ok(Self::new(home.join(CONFIG_DIR_NAME)))
    }

    /// The global configuration directory.
    pub fn global_dir(&self) -> &Path {
        &self.global_dir
    }

    /// Path of the interpreter registry document.
    pub fn interpreters_file(&self) -> PathBuf {
        self.global_dir.join(INTERPRETERS_FILE)
    }

    /// Path of the template store document.
    pub fn templates_file(&self) -> PathBuf {
        self.global_dir.join(TEMPLATES_FILE)
    }

    /// Path of the project-local document for a project root.
    pub fn project_file(project_root: &Path) -> PathBuf {
        project_root.join(CONFIG_DIR_NAME).join(PROJECT_FILE)
    }
}

/// Find the nearest ancestor of `start` (inclusive) holding a project file.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        if ConfigPaths::project_file(&current).is_file() {
            return Some(current);
        }

        if !current.pop() {
            return None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn discover_prefers_override() {
        let paths = ConfigPaths::discover(Some(Path::new("/tmp/custom"))).unwrap();
        assert_eq!(paths.global_dir(), Path::new("/tmp/custom"));
        assert_eq!(
            paths.interpreters_file(),
            PathBuf::from("/tmp/custom/interpreters.json")
        );
        assert_eq!(
            paths.templates_file(),
            PathBuf::from("/tmp/custom/templates.json")
        );
    }

    #[test]
    fn project_file_is_inside_config_dir() {
        assert_eq!(
            ConfigPaths::project_file(Path::new("/work/app")),
            PathBuf::from("/work/app/.pynstal/project.json")
        );
    }

    #[test]
    fn find_project_root_walks_up() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("src").join("pkg");
        fs::create_dir_all(&nested).unwrap();
        fs::create_dir_all(temp.path().join(".pynstal")).unwrap();
        fs::write(ConfigPaths::project_file(temp.path()), "{}").unwrap();

        assert_eq!(find_project_root(&nested), Some(temp.path().to_path_buf()));
    }

    #[test]
    fn find_project_root_ignores_bare_config_dir() {
        let temp = TempDir::new().unwrap();
        // A global config dir (no project.json) must not mark a project.
        fs::create_dir_all(temp.path().join(".pynstal")).unwrap();
        fs::write(temp.path().join(".pynstal").join(INTERPRETERS_FILE), "{}").unwrap();

        let found = find_project_root(temp.path());
        assert_ne!(found, Some(temp.path().to_path_buf()));
    }

    #[test]
    fn find_project_root_prefers_nearest() {
        let temp = TempDir::new().unwrap();
        let inner = temp.path().join("inner");
        fs::create_dir_all(inner.join(".pynstal")).unwrap();
        fs::create_dir_all(temp.path().join(".pynstal")).unwrap();
        fs::write(ConfigPaths::project_file(temp.path()), "{}").unwrap();
        fs::write(ConfigPaths::project_file(&inner), "{}").unwrap();

        assert_eq!(find_project_root(&inner), Some(inner.clone()));
    }
}

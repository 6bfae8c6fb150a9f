//! Where things live inside a virtual environment.

use std::path::{Path, PathBuf};

use crate::detection::Platform;
use crate::interpreter::absolute_path;

/// Marker file written by the `venv` module into every environment.
pub const VENV_MARKER: &str = "pyvenv.cfg";

/// Paths inside one virtual environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenvLayout {
    root: PathBuf,
    platform: Platform,
}

impl VenvLayout {
    /// Layout of the environment at `root` (made absolute).
    pub fn new(root: &Path, platform: Platform) -> Self {
        Self {
            root: absolute_path(root),
            platform,
        }
    }

    /// Layout for the current platform.
    pub fn current(root: &Path) -> Self {
        Self::new(root, Platform::current())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the environment's executables.
    pub fn bin_dir(&self) -> PathBuf {
        match self.platform {
            Platform::Posix => self.root.join("bin"),
            Platform::Windows => self.root.join("Scripts"),
        }
    }

    /// The environment's interpreter.
    pub fn python(&self) -> PathBuf {
        match self.platform {
            Platform::Posix => self.bin_dir().join("python"),
            Platform::Windows => self.bin_dir().join("python.exe"),
        }
    }

    /// Whether `root` looks like an environment created by `venv`.
    pub fn is_managed(&self) -> bool {
        self.root.join(VENV_MARKER).is_file()
    }

    /// Shell command that activates the environment.
    pub fn activation_command(&self) -> String {
        match self.platform {
            Platform::Posix => format!("source {}", self.bin_dir().join("activate").display()),
            Platform::Windows => self.bin_dir().join("activate").display().to_string(),
        }
    }

    /// Directory whose project owns this environment.
    pub fn parent(&self) -> PathBuf {
        self.root
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[cfg(unix)]
    #[test]
    fn posix_layout() {
        let layout = VenvLayout::new(Path::new("/work/.venv"), Platform::Posix);
        assert_eq!(layout.python(), PathBuf::from("/work/.venv/bin/python"));
        assert_eq!(layout.activation_command(), "source /work/.venv/bin/activate");
        assert_eq!(layout.parent(), PathBuf::from("/work"));
    }

    #[test]
    fn windows_layout_uses_scripts() {
        let layout = VenvLayout::new(Path::new("/work/env"), Platform::Windows);
        assert!(layout.python().ends_with("Scripts/python.exe"));
        assert!(layout.activation_command().contains("Scripts"));
    }

    #[test]
    fn relative_roots_become_absolute() {
        let layout = VenvLayout::current(Path::new("env"));
        assert!(layout.root().is_absolute());
    }

    #[test]
    fn managed_requires_marker() {
        let temp = TempDir::new().unwrap();
        let layout = VenvLayout::current(temp.path());
        assert!(!layout.is_managed());

        std::fs::write(temp.path().join(VENV_MARKER), "home = /usr/bin\n").unwrap();
        assert!(layout.is_managed());
    }
}

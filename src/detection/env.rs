//! Snapshot of the host facts detection depends on.
//!
//! Strategies never read `std::env` or the home directory themselves; they
//! get everything from a [`ProbeEnv`], so tests can point them at a
//! temporary directory tree.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::types::Platform;

/// Python versions with a conventional `C:\PythonXY` install root.
const WINDOWS_ROOT_VERSIONS: &[&str] = &["38", "39", "310", "311", "312", "313", "314"];

/// Host facts consumed by detection strategies.
#[derive(Debug, Clone)]
pub struct ProbeEnv {
    platform: Platform,
    home: Option<PathBuf>,
    vars: HashMap<String, String>,
    search_path: Vec<PathBuf>,
    system_dirs: Vec<PathBuf>,
}

impl ProbeEnv {
    /// An empty environment for `platform`: no home, no variables, no dirs.
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            home: None,
            vars: HashMap::new(),
            search_path: Vec::new(),
            system_dirs: Vec::new(),
        }
    }

    /// Capture the real process environment.
    pub fn from_system() -> Self {
        let platform = Platform::current();
        let home = dirs::home_dir();
        let vars: HashMap<String, String> = std::env::vars().collect();
        let search_path = parse_search_path();
        let system_dirs = default_system_dirs(platform, home.as_deref());

        Self {
            platform,
            home,
            vars,
            search_path,
            system_dirs,
        }
    }

    /// Set the home directory.
    pub fn with_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }

    /// Set an environment variable.
    pub fn with_var(mut self, key: &str, value: impl Into<String>) -> Self {
        self.vars.insert(key.to_string(), value.into());
        self
    }

    /// Replace the executable search path.
    pub fn with_search_path(mut self, entries: Vec<PathBuf>) -> Self {
        self.search_path = entries;
        self
    }

    /// Replace the system install directories.
    pub fn with_system_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.system_dirs = dirs;
        self
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn home(&self) -> Option<&Path> {
        self.home.as_deref()
    }

    /// Look up a variable; empty values count as unset.
    pub fn var(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn search_path(&self) -> &[PathBuf] {
        &self.search_path
    }

    pub fn system_dirs(&self) -> &[PathBuf] {
        &self.system_dirs
    }

    /// `home/<relative>`, if a home directory is known.
    pub fn home_join(&self, relative: &str) -> Option<PathBuf> {
        self.home.as_ref().map(|h| h.join(relative))
    }
}

/// Parse the process `PATH` into directories.
pub fn parse_search_path() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).collect())
        .unwrap_or_default()
}

/// Conventional system-wide install directories for a platform.
pub fn default_system_dirs(platform: Platform, home: Option<&Path>) -> Vec<PathBuf> {
    match platform {
        Platform::Posix => {
            let mut dirs = vec![
                PathBuf::from("/usr/bin"),
                PathBuf::from("/usr/local/bin"),
                PathBuf::from("/opt/python"),
            ];
            if let Some(home) = home {
                dirs.push(home.join(".local").join("bin"));
            }
            dirs
        }
        Platform::Windows => WINDOWS_ROOT_VERSIONS
            .iter()
            .map(|v| PathBuf::from(format!("C:\\Python{}", v)))
            .collect(),
    }
}

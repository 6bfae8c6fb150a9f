//! Candidate strategies for each interpreter source.

use std::path::{Path, PathBuf};

use super::env::ProbeEnv;
use super::probe::{is_executable, scan_dir, subdirs};
use super::types::{CandidateStrategy, InterpreterSource, Platform};

/// Conda distribution roots under the home directory.
const CONDA_HOME_ROOTS: &[&str] = &["anaconda3", "miniconda3", "miniforge3", "mambaforge"];

/// Well-known system install directories.
pub struct SystemStrategy;

impl CandidateStrategy for SystemStrategy {
    fn source(&self) -> InterpreterSource {
        InterpreterSource::System
    }

    fn candidates(&self, env: &ProbeEnv) -> Vec<PathBuf> {
        let platform = env.platform();
        let mut found: Vec<PathBuf> = env
            .system_dirs()
            .iter()
            .flat_map(|dir| scan_dir(dir, platform))
            .collect();

        if platform == Platform::Windows {
            if let Some(local) = env.var("LOCALAPPDATA") {
                let installs = Path::new(local).join("Programs").join("Python");
                for dir in subdirs(&installs) {
                    found.extend(scan_dir(&dir, platform));
                }
            }
        }

        found
    }
}

/// Versions installed by pyenv (or pyenv-win).
pub struct PyenvStrategy;

impl PyenvStrategy {
    fn root(env: &ProbeEnv) -> Option<PathBuf> {
        env.var("PYENV_ROOT")
            .map(PathBuf::from)
            .or_else(|| env.home_join(".pyenv"))
    }
}

impl CandidateStrategy for PyenvStrategy {
    fn source(&self) -> InterpreterSource {
        InterpreterSource::Pyenv
    }

    fn candidates(&self, env: &ProbeEnv) -> Vec<PathBuf> {
        let Some(root) = Self::root(env) else {
            return Vec::new();
        };
        let platform = env.platform();

        match platform {
            Platform::Posix => subdirs(&root.join("versions"))
                .iter()
                .flat_map(|version| scan_dir(&version.join("bin"), platform))
                .collect(),
            Platform::Windows => [
                root.join("versions"),
                root.join("pyenv-win").join("versions"),
            ]
            .iter()
            .flat_map(|versions| subdirs(versions))
            .flat_map(|version| scan_dir(&version, platform))
            .collect(),
        }
    }
}

/// Conda base installs and their named environments.
pub struct CondaStrategy;

impl CondaStrategy {
    fn roots(env: &ProbeEnv) -> Vec<PathBuf> {
        let mut roots = Vec::new();
        if let Some(prefix) = env.var("CONDA_PREFIX") {
            roots.push(PathBuf::from(prefix));
        }
        roots.extend(CONDA_HOME_ROOTS.iter().filter_map(|r| env.home_join(r)));
        roots
    }

    fn interpreter_dir(prefix: &Path, platform: Platform) -> PathBuf {
        match platform {
            Platform::Posix => prefix.join("bin"),
            Platform::Windows => prefix.to_path_buf(),
        }
    }
}

impl CandidateStrategy for CondaStrategy {
    fn source(&self) -> InterpreterSource {
        InterpreterSource::Conda
    }

    fn candidates(&self, env: &ProbeEnv) -> Vec<PathBuf> {
        let platform = env.platform();
        let mut found = Vec::new();

        for root in Self::roots(env) {
            found.extend(scan_dir(&Self::interpreter_dir(&root, platform), platform));
            for named in subdirs(&root.join("envs")) {
                found.extend(scan_dir(&Self::interpreter_dir(&named, platform), platform));
            }
        }

        found
    }
}

/// Launchers reachable through the executable search path.
pub struct SearchPathStrategy;

impl SearchPathStrategy {
    fn names(platform: Platform) -> &'static [&'static str] {
        match platform {
            Platform::Posix => &["python", "python3"],
            Platform::Windows => &["python.exe", "py.exe"],
        }
    }
}

impl CandidateStrategy for SearchPathStrategy {
    fn source(&self) -> InterpreterSource {
        InterpreterSource::Path
    }

    fn candidates(&self, env: &ProbeEnv) -> Vec<PathBuf> {
        let names = Self::names(env.platform());
        env.search_path()
            .iter()
            .flat_map(|dir| names.iter().map(move |name| dir.join(name)))
            .filter(|candidate| candidate.is_file() && is_executable(candidate))
            .collect()
    }
}

/// Every strategy, in reporting order. Each one branches on the platform itself.
pub fn standard_strategies() -> Vec<Box<dyn CandidateStrategy>> {
    vec![
        Box::new(SystemStrategy),
        Box::new(PyenvStrategy),
        Box::new(CondaStrategy),
        Box::new(SearchPathStrategy),
    ]
}

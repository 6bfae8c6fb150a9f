//! Low-level filesystem and version probing.

use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use super::types::Platform;
use crate::error::{PynstalError, Result};
use crate::process::{CommandSpec, ProcessExecutor, SystemExecutor};

static POSIX_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^python(?:3(?:\.\d+)?)?$").expect("POSIX_NAME regex must compile")
});

static WINDOWS_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^python(?:3(?:\.\d+)?)?\.exe$").expect("WINDOWS_NAME regex must compile")
});

static VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Python\s+(\d+\.\d+(?:\.\d+)?(?:[A-Za-z0-9+.-]*)?)")
        .expect("VERSION regex must compile")
});

/// Check if a file has any execute permission bit set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On Windows, executability is determined by file extension, not permission bits.
#[cfg(not(unix))]
pub fn is_executable(_path: &Path) -> bool {
    true
}

/// Whether a file name looks like a CPython launcher for the platform.
///
/// Matches `python`, `python3` and `python3.N`, with `.exe` on Windows.
/// Versioned config helpers such as `python3.12-config` never match.
pub fn is_interpreter_name(name: &str, platform: Platform) -> bool {
    match platform {
        Platform::Posix => POSIX_NAME.is_match(name),
        Platform::Windows => WINDOWS_NAME.is_match(name),
    }
}

/// List interpreter-named executables directly inside `dir`.
///
/// Unreadable or missing directories yield nothing.
pub fn scan_dir(dir: &Path, platform: Platform) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut found: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_name()
                .to_str()
                .is_some_and(|name| is_interpreter_name(name, platform))
        })
        .map(|e| e.path())
        .filter(|p| p.is_file() && is_executable(p))
        .collect();
    found.sort();
    found
}

/// Subdirectories of `dir`, sorted. Missing directories yield nothing.
pub fn subdirs(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut dirs: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    dirs.sort();
    dirs
}

/// Extract the version from `python --version` output.
pub fn parse_python_version(output: &str) -> Option<String> {
    VERSION
        .captures(output)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Asks an executable for its Python version.
pub trait VersionProbe {
    /// The reported version, or `None` if the file is not a working interpreter.
    fn python_version(&self, path: &Path) -> Option<String>;
}

/// Probe that runs `<path> --version`.
///
/// Old interpreters print the banner on stderr, newer ones on stdout, so
/// both streams are searched.
pub struct ProcessVersionProbe {
    executor: Arc<dyn ProcessExecutor>,
}

impl ProcessVersionProbe {
    pub fn new(executor: Arc<dyn ProcessExecutor>) -> Self {
        Self { executor }
    }
}

impl Default for ProcessVersionProbe {
    fn default() -> Self {
        Self::new(Arc::new(SystemExecutor))
    }
}

impl VersionProbe for ProcessVersionProbe {
    fn python_version(&self, path: &Path) -> Option<String> {
        let spec = CommandSpec::new(path).arg("--version");
        match self.executor.run(&spec) {
            Ok(output) if output.success => parse_python_version(&output.combined()),
            Ok(output) => {
                tracing::debug!(
                    "{} --version exited with {:?}",
                    path.display(),
                    output.exit_code
                );
                None
            }
            Err(e) => {
                tracing::debug!("could not run {}: {}", path.display(), e);
                None
            }
        }
    }
}

/// Check that `path` is an executable Python interpreter and return its version.
pub fn validate_interpreter(path: &Path, probe: &dyn VersionProbe) -> Result<String> {
    let invalid = |reason: &str| PynstalError::InvalidInterpreter {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };

    if !path.exists() {
        return Err(invalid("file does not exist"));
    }
    if !path.is_file() {
        return Err(invalid("not a regular file"));
    }
    if !is_executable(path) {
        return Err(invalid("file is not executable"));
    }

    probe
        .python_version(path)
        .ok_or_else(|| invalid("did not report a Python version"))
}


#[cfg(test)]
mod tests {
    use super::test_support::{create_fake_binary, TableProbe};
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn posix_names_match_versioned_launchers_only() {
        for name in ["python", "python3", "python3.12", "python3.9"] {
            assert!(is_interpreter_name(name, Platform::Posix), "{name}");
        }
        for name in [
            "python3.12-config",
            "python2",
            "pythonw",
            "python3-config",
            "python.exe",
            "ipython",
        ] {
            assert!(!is_interpreter_name(name, Platform::Posix), "{name}");
        }
    }

    #[test]
    fn windows_names_require_exe() {
        assert!(is_interpreter_name("python.exe", Platform::Windows));
        assert!(is_interpreter_name("PYTHON.EXE", Platform::Windows));
        assert!(is_interpreter_name("python3.11.exe", Platform::Windows));
        assert!(!is_interpreter_name("python", Platform::Windows));
        assert!(!is_interpreter_name("pythonw.exe", Platform::Windows));
    }

    #[test]
    fn parses_version_banner() {
        assert_eq!(
            parse_python_version("Python 3.12.4\n").as_deref(),
            Some("3.12.4")
        );
        assert_eq!(parse_python_version("Python 3.8").as_deref(), Some("3.8"));
        assert_eq!(
            parse_python_version("Python 3.13.0rc1\n").as_deref(),
            Some("3.13.0rc1")
        );
        assert_eq!(parse_python_version("ruby 3.2.0"), None);
        assert_eq!(parse_python_version(""), None);
    }

    #[cfg(unix)]
    #[test]
    fn scan_dir_lists_matching_executables() {
        let temp = TempDir::new().unwrap();
        create_fake_binary(&temp.path().join("python3.11"));
        create_fake_binary(&temp.path().join("python3"));
        create_fake_binary(&temp.path().join("python3.11-config"));
        std::fs::write(temp.path().join("python"), "not executable").unwrap();

        let found = scan_dir(temp.path(), Platform::Posix);
        assert_eq!(
            found,
            vec![temp.path().join("python3"), temp.path().join("python3.11")]
        );
    }

    #[test]
    fn scan_missing_dir_is_empty() {
        assert!(scan_dir(Path::new("/definitely/not/here"), Platform::Posix).is_empty());
        assert!(subdirs(Path::new("/definitely/not/here")).is_empty());
    }

    #[test]
    fn validate_rejects_missing_file() {
        let probe = TableProbe::default();
        let err = validate_interpreter(Path::new("/no/such/python"), &probe).unwrap_err();
        assert!(matches!(err, PynstalError::InvalidInterpreter { .. }));
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn validate_rejects_directory() {
        let temp = TempDir::new().unwrap();
        let probe = TableProbe::default();
        let err = validate_interpreter(temp.path(), &probe).unwrap_err();
        assert!(err.to_string().contains("not a regular file"));
    }

    #[cfg(unix)]
    #[test]
    fn validate_rejects_non_executable_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("python3");
        std::fs::write(&path, "").unwrap();
        let probe = TableProbe::default().with(&path, "3.12.0");

        let err = validate_interpreter(&path, &probe).unwrap_err();
        assert!(err.to_string().contains("not executable"));
    }

    #[cfg(unix)]
    #[test]
    fn validate_requires_version_report() {
        let temp = TempDir::new().unwrap();
        let good = temp.path().join("python3");
        let bad = temp.path().join("python");
        create_fake_binary(&good);
        create_fake_binary(&bad);
        let probe = TableProbe::default().with(&good, "3.12.1");

        assert_eq!(validate_interpreter(&good, &probe).unwrap(), "3.12.1");
        assert!(validate_interpreter(&bad, &probe)
            .unwrap_err()
            .to_string()
            .contains("Python version"));
    }

    #[cfg(unix)]
    #[test]
    fn process_probe_reads_stderr_banner() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("python2.7");
        std::fs::write(&path, "#!/bin/sh\necho 'Python 2.7.18' >&2\n").unwrap();
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();

        let probe = ProcessVersionProbe::default();
        assert_eq!(probe.python_version(&path).as_deref(), Some("2.7.18"));
    }

    #[cfg(unix)]
    #[test]
    fn process_probe_rejects_failing_program() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("python3");
        std::fs::write(&path, "#!/bin/sh\necho 'Python 3.12.0'\nexit 3\n").unwrap();
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();

        let probe = ProcessVersionProbe::default();
        assert_eq!(probe.python_version(&path), None);
    }
}

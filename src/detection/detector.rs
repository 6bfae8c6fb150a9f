//! Runs every strategy and validates the candidates.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::env::ProbeEnv;
use super::probe::{ProcessVersionProbe, VersionProbe};
use super::strategies::standard_strategies;
use super::types::{CandidateStrategy, DetectedInterpreter};
use crate::interpreter::InterpreterPath;

/// Finds Python interpreters installed on the host.
///
/// Results are grouped by source (system, pyenv, conda, search path) and
/// sorted by path within a group. A file reachable from several places,
/// such as a search-path symlink to a pyenv build, is reported once, by
/// whichever group saw it first. Candidates that fail the version probe
/// are dropped silently.
pub struct InterpreterDetector {
    env: ProbeEnv,
    probe: Arc<dyn VersionProbe>,
    strategies: Vec<Box<dyn CandidateStrategy>>,
}

impl InterpreterDetector {
    /// Detector with the platform's standard strategies.
    pub fn new(env: ProbeEnv, probe: Arc<dyn VersionProbe>) -> Self {
        let strategies = standard_strategies();
        Self {
            env,
            probe,
            strategies,
        }
    }

    /// Detector over the real host environment.
    pub fn system() -> Self {
        Self::new(
            ProbeEnv::from_system(),
            Arc::new(ProcessVersionProbe::default()),
        )
    }

    /// Replace the strategy list.
    pub fn with_strategies(mut self, strategies: Vec<Box<dyn CandidateStrategy>>) -> Self {
        self.strategies = strategies;
        self
    }

    /// Run detection. Never fails; an empty host yields an empty list.
    pub fn detect(&self) -> Vec<DetectedInterpreter> {
        let mut groups: Vec<_> = self
            .strategies
            .iter()
            .map(|s| (s.source(), s.candidates(&self.env)))
            .collect();
        groups.sort_by_key(|(source, _)| *source);

        let mut seen = HashSet::new();
        let mut detected = Vec::new();

        for (source, mut candidates) in groups {
            candidates.sort();
            candidates.dedup();

            for candidate in candidates {
                if !seen.insert(self.identity(&candidate)) {
                    tracing::debug!("skipping duplicate {}", candidate.display());
                    continue;
                }

                match self.probe.python_version(&candidate) {
                    Some(version) => detected.push(DetectedInterpreter {
                        path: InterpreterPath::new(&candidate),
                        version,
                        source,
                    }),
                    None => {
                        tracing::debug!("{} did not report a Python version", candidate.display())
                    }
                }
            }
        }

        tracing::debug!("detected {} interpreter(s)", detected.len());
        detected
    }

    /// Key identifying the underlying file: the symlink-resolved path,
    /// case-folded on Windows.
    fn identity(&self, path: &Path) -> String {
        let real: PathBuf = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        let key = real.to_string_lossy().to_string();
        if self.env.platform().case_insensitive() {
            key.to_lowercase()
        } else {
            key
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::detection::probe::test_support::{create_fake_binary, TableProbe};
    use crate::detection::types::{InterpreterSource, Platform};
    use tempfile::TempDir;

    struct Fixed(InterpreterSource, Vec<PathBuf>);

    impl CandidateStrategy for Fixed {
        fn source(&self) -> InterpreterSource {
            self.0
        }

        fn candidates(&self, _env: &ProbeEnv) -> Vec<PathBuf> {
            self.1.clone()
        }
    }

    fn detector(probe: TableProbe, strategies: Vec<Box<dyn CandidateStrategy>>) -> InterpreterDetector {
        InterpreterDetector::new(ProbeEnv::new(Platform::Posix), Arc::new(probe))
            .with_strategies(strategies)
    }

    #[test]
    fn empty_host_detects_nothing() {
        let d = InterpreterDetector::new(
            ProbeEnv::new(Platform::Posix),
            Arc::new(TableProbe::default()),
        );
        assert!(d.detect().is_empty());
    }

    #[test]
    fn groups_in_source_order_and_sorts_within() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("sys/python3.9");
        let b = temp.path().join("sys/python3.12");
        let c = temp.path().join("pyenv/python");
        for p in [&a, &b, &c] {
            create_fake_binary(p);
        }

        let probe = TableProbe::default()
            .with(&a, "3.9.1")
            .with(&b, "3.12.0")
            .with(&c, "3.11.2");
        let d = detector(
            probe,
            vec![
                Box::new(Fixed(InterpreterSource::Pyenv, vec![c.clone()])),
                Box::new(Fixed(InterpreterSource::System, vec![a.clone(), b.clone()])),
            ],
        );

        let found = d.detect();
        let paths: Vec<_> = found.iter().map(|i| i.path.as_path().to_path_buf()).collect();
        assert_eq!(paths, vec![b, a, c]);
        assert_eq!(found[0].source, InterpreterSource::System);
        assert_eq!(found[2].source, InterpreterSource::Pyenv);
        assert_eq!(found[2].version, "3.11.2");
    }

    #[test]
    fn symlinked_duplicate_is_reported_once_by_first_group() {
        let temp = TempDir::new().unwrap();
        let real = temp.path().join("pyenv/bin/python3.12");
        create_fake_binary(&real);
        let link_dir = temp.path().join("shims");
        fs::create_dir_all(&link_dir).unwrap();
        let link = link_dir.join("python3");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        let probe = TableProbe::default()
            .with(&real, "3.12.3")
            .with(&link, "3.12.3");
        let d = detector(
            probe,
            vec![
                Box::new(Fixed(InterpreterSource::Path, vec![link.clone()])),
                Box::new(Fixed(InterpreterSource::Pyenv, vec![real.clone()])),
            ],
        );

        let found = d.detect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].source, InterpreterSource::Pyenv);
        assert_eq!(found[0].path.as_path(), real.as_path());
    }

    #[test]
    fn failing_candidates_are_dropped_and_not_reprobed() {
        let temp = TempDir::new().unwrap();
        let good = temp.path().join("python3");
        let bad = temp.path().join("python");
        create_fake_binary(&good);
        create_fake_binary(&bad);

        let probe = Arc::new(TableProbe::default().with(&good, "3.10.0"));
        let d = InterpreterDetector::new(ProbeEnv::new(Platform::Posix), probe.clone())
            .with_strategies(vec![
                Box::new(Fixed(InterpreterSource::System, vec![bad.clone(), good.clone()])),
                Box::new(Fixed(InterpreterSource::Path, vec![bad.clone()])),
            ]);

        let found = d.detect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].path.as_path(), good.as_path());

        let calls = probe.calls.lock().unwrap();
        assert_eq!(calls.iter().filter(|p| **p == bad).count(), 1);
    }

    #[test]
    fn scans_a_fake_pyenv_tree_end_to_end() {
        let temp = TempDir::new().unwrap();
        let home = temp.path().join("home");
        let py = home.join(".pyenv/versions/3.11.9/bin/python3.11");
        create_fake_binary(&py);

        let env = ProbeEnv::new(Platform::Posix).with_home(&home);
        let d = InterpreterDetector::new(env, Arc::new(TableProbe::default().with(&py, "3.11.9")));

        let found = d.detect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].source, InterpreterSource::Pyenv);
    }
}

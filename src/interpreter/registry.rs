//! Registry operations: validation, persistence and default resolution.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::document::InterpreterDocument;
use super::path::InterpreterPath;
use crate::config::{find_project_root, ConfigPaths, ConfigStore, ProjectFile};
use crate::detection::{validate_interpreter, DetectedInterpreter, InterpreterDetector, VersionProbe};
use crate::error::{PynstalError, Result};

/// Where a resolved interpreter came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultOrigin {
    /// Given on the command line.
    Explicit,
    /// Project default from the project rooted at this directory.
    Project(PathBuf),
    /// Global default.
    Global,
}

impl std::fmt::Display for DefaultOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DefaultOrigin::Explicit => write!(f, "--interpreter"),
            DefaultOrigin::Project(root) => write!(f, "project default ({})", root.display()),
            DefaultOrigin::Global => write!(f, "global default"),
        }
    }
}

/// An interpreter chosen for an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInterpreter {
    pub path: InterpreterPath,
    pub origin: DefaultOrigin,
}

/// A freshly registered interpreter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedInterpreter {
    pub path: InterpreterPath,
    pub version: String,
}

/// Picks which detected interpreters to register.
pub type SelectFn<'a> = dyn FnMut(&[DetectedInterpreter]) -> Result<Vec<InterpreterPath>> + 'a;

/// How [`InterpreterRegistry::detect_and_merge`] treats the candidates.
pub enum MergeMode<'a> {
    /// Report only; nothing is written.
    List,
    /// Register every candidate not already present.
    AddAll,
    /// Offer the unregistered candidates to a selector and register its picks.
    Interactive(&'a mut SelectFn<'a>),
}

/// Outcome of a detect-and-merge run.
#[derive(Debug, Clone, Default)]
pub struct MergeReport {
    /// Everything detection found, in detection order.
    pub candidates: Vec<DetectedInterpreter>,
    /// Paths newly written to the registry.
    pub added: Vec<InterpreterPath>,
    /// Candidates that were registered before this run.
    pub already_registered: Vec<InterpreterPath>,
}

/// The global interpreter registry, loaded for one invocation.
///
/// Every mutating call validates first, applies the change in memory and
/// then rewrites the document. A failed call leaves both memory and disk
/// untouched.
pub struct InterpreterRegistry {
    store: ConfigStore,
    probe: Arc<dyn VersionProbe>,
    document: InterpreterDocument,
}

impl InterpreterRegistry {
    /// Load the registry document through `store`.
    pub fn load(store: ConfigStore, probe: Arc<dyn VersionProbe>) -> Result<Self> {
        let file = store.load_interpreters()?;
        let document = InterpreterDocument::from_file(&file);
        Ok(Self {
            store,
            probe,
            document,
        })
    }

    pub fn interpreters(&self) -> &[InterpreterPath] {
        self.document.interpreters()
    }

    pub fn global_default(&self) -> Option<&InterpreterPath> {
        self.document.global_default()
    }

    pub fn is_registered(&self, path: &Path) -> bool {
        self.document.contains(&InterpreterPath::new(path))
    }

    /// Validate and register an interpreter.
    pub fn add(&mut self, path: &Path) -> Result<AddedInterpreter> {
        let path = InterpreterPath::new(path);
        if self.document.contains(&path) {
            return Err(PynstalError::AlreadyRegistered {
                path: path.as_path().to_path_buf(),
            });
        }

        let version = validate_interpreter(path.as_path(), self.probe.as_ref())?;
        self.document.insert(path.clone());
        self.save()?;

        tracing::debug!("registered {} (Python {})", path, version);
        Ok(AddedInterpreter { path, version })
    }

    /// Unregister an interpreter, clearing the global default if it pointed there.
    pub fn remove(&mut self, path: &Path) -> Result<InterpreterPath> {
        let path = InterpreterPath::new(path);
        if !self.document.remove(&path) {
            return Err(PynstalError::NotFound {
                path: path.as_path().to_path_buf(),
            });
        }
        self.save()?;
        Ok(path)
    }

    /// Make `path` the global default.
    ///
    /// With `register`, an unknown path is validated and added first;
    /// otherwise it must already be registered.
    pub fn set_default(&mut self, path: &Path, register: bool) -> Result<InterpreterPath> {
        let path = InterpreterPath::new(path);

        if !self.document.contains(&path) {
            if !register {
                return Err(PynstalError::NotFound {
                    path: path.as_path().to_path_buf(),
                });
            }
            validate_interpreter(path.as_path(), self.probe.as_ref())?;
            self.document.insert(path.clone());
        }

        self.document.set_default(&path);
        self.save()?;
        Ok(path)
    }

    /// Set the project default for the project governing `working_dir`.
    ///
    /// The project is the nearest ancestor with a project file, or
    /// `working_dir` itself when there is none. Returns the project root.
    pub fn set_project_default(&self, working_dir: &Path, path: &Path) -> Result<PathBuf> {
        let path = InterpreterPath::new(path);
        if !self.document.contains(&path) {
            return Err(PynstalError::NotFound {
                path: path.as_path().to_path_buf(),
            });
        }

        let root = find_project_root(working_dir).unwrap_or_else(|| working_dir.to_path_buf());
        self.write_project_default(&root, Some(&path))?;
        Ok(root)
    }

    /// Remove the project default governing `working_dir`.
    ///
    /// Returns the project root that was cleared, or `None` when no project
    /// file exists above `working_dir`.
    pub fn clear_project_default(&self, working_dir: &Path) -> Result<Option<PathBuf>> {
        let Some(root) = find_project_root(working_dir) else {
            return Ok(None);
        };
        self.write_project_default(&root, None)?;
        Ok(Some(root))
    }

    /// Register `interpreter` if needed and pin it as the default of the
    /// project rooted exactly at `project_root`.
    pub fn pin_project_default(
        &mut self,
        project_root: &Path,
        interpreter: &InterpreterPath,
    ) -> Result<()> {
        if !self.is_registered(interpreter.as_path()) {
            self.add(interpreter.as_path())?;
        }
        self.write_project_default(project_root, Some(interpreter))
    }

    /// Unregister every interpreter under `dir` and drop the project default
    /// at `project_root` if it pointed under `dir`.
    pub fn forget_environment(&mut self, dir: &Path, project_root: &Path) -> Result<Vec<InterpreterPath>> {
        let removed = self.document.remove_inside(dir);
        if !removed.is_empty() {
            self.save()?;
        }

        if ConfigPaths::project_file(project_root).is_file() {
            let project = self.store.load_project(project_root)?;
            let points_inside = project
                .default_interpreter
                .as_deref()
                .is_some_and(|p| InterpreterPath::new(p).is_inside(dir));
            if points_inside {
                self.write_project_default(project_root, None)?;
            }
        }

        Ok(removed)
    }

    /// Resolve the default interpreter for `working_dir`.
    ///
    /// A registered project default wins over the global default. A project
    /// default that is no longer registered is skipped with a warning.
    pub fn resolve_default(&self, working_dir: &Path) -> Result<ResolvedInterpreter> {
        if let Some((root, project)) = self.store.project_for(working_dir)? {
            if let Some(raw) = project.default_interpreter.as_deref() {
                let path = InterpreterPath::new(raw);
                if self.document.contains(&path) {
                    return Ok(ResolvedInterpreter {
                        path,
                        origin: DefaultOrigin::Project(root),
                    });
                }
                tracing::warn!(
                    "project default {} in {} is not registered; ignoring it",
                    path,
                    root.display()
                );
            }
        }

        match self.document.global_default() {
            Some(path) => Ok(ResolvedInterpreter {
                path: path.clone(),
                origin: DefaultOrigin::Global,
            }),
            None => Err(PynstalError::NoDefaultAvailable),
        }
    }

    /// Use `explicit` when given, otherwise the default for `working_dir`.
    ///
    /// Explicit paths need not be registered.
    pub fn resolve(&self, explicit: Option<&Path>, working_dir: &Path) -> Result<ResolvedInterpreter> {
        match explicit {
            Some(path) => Ok(ResolvedInterpreter {
                path: InterpreterPath::new(path),
                origin: DefaultOrigin::Explicit,
            }),
            None => self.resolve_default(working_dir),
        }
    }

    /// Run detection and merge the results according to `mode`.
    pub fn detect_and_merge(
        &mut self,
        detector: &InterpreterDetector,
        mode: MergeMode<'_>,
    ) -> Result<MergeReport> {
        let candidates = detector.detect();

        let (already, fresh): (Vec<_>, Vec<_>) = candidates
            .iter()
            .cloned()
            .partition(|c| self.document.contains(&c.path));

        let mut report = MergeReport {
            already_registered: already.into_iter().map(|c| c.path).collect(),
            candidates,
            added: Vec::new(),
        };

        let chosen: Vec<InterpreterPath> = match mode {
            MergeMode::List => return Ok(report),
            MergeMode::AddAll => fresh.iter().map(|c| c.path.clone()).collect(),
            MergeMode::Interactive(select) => {
                if fresh.is_empty() {
                    return Ok(report);
                }
                select(&fresh)?
            }
        };

        for path in chosen {
            if !fresh.iter().any(|c| c.path == path) {
                tracing::warn!("ignoring selection {} which was not offered", path);
                continue;
            }
            if self.document.insert(path.clone()) {
                report.added.push(path);
            }
        }

        if !report.added.is_empty() {
            self.save()?;
        }
        Ok(report)
    }

    fn write_project_default(&self, root: &Path, path: Option<&InterpreterPath>) -> Result<()> {
        let file = ProjectFile {
            default_interpreter: path.map(|p| p.to_string()),
        };
        self.store.save_project(root, &file)
    }

    fn save(&self) -> Result<()> {
        self.store.save_interpreters(&self.document.to_file())
    }
}

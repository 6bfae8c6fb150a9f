//! pynstal - Python interpreter discovery, package templates and virtualenvs.
//!
//! pynstal keeps a global registry of Python interpreters, a store of named
//! package templates, and creates virtual environments from them. A project
//! may pin its own default interpreter, which takes precedence over the
//! global one.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration file locations, schema and atomic storage
//! - [`detection`] - Interpreter discovery strategies and version probing
//! - [`error`] - Error types and result aliases
//! - [`interpreter`] - Interpreter registry and default resolution
//! - [`process`] - External process execution
//! - [`templates`] - Package template management
//! - [`ui`] - Interactive prompts, spinners, and terminal output
//! - [`venv`] - Virtual environment creation, installs and removal
//!
//! # Example
//!
//! ```
//! use pynstal::config::{ConfigPaths, ConfigStore};
//! use pynstal::templates::TemplateManager;
//! use tempfile::TempDir;
//!
//! let temp = TempDir::new().unwrap();
//! let store = ConfigStore::new(ConfigPaths::new(temp.path()));
//!
//! let mut templates = TemplateManager::load(store).unwrap();
//! templates
//!     .create("web", vec!["flask".into(), "gunicorn".into()], vec![])
//!     .unwrap();
//! assert_eq!(templates.show("web").unwrap().packages, ["flask", "gunicorn"]);
//! ```
//!
//! Registry and environment flows are covered by the integration tests.

pub mod cli;
pub mod config;
pub mod detection;
pub mod error;
pub mod interpreter;
pub mod process;
pub mod templates;
pub mod ui;
pub mod venv;

pub use error::{PynstalError, Result};

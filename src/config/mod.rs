//! Layered configuration storage.
//!
//! This module owns every file pynstal persists:
//! - Document types in [`schema`]
//! - File locations and project discovery in [`paths`]
//! - Loading and atomic saving in [`store`]
//!
//! # Configuration File Locations
//!
//! - Global interpreter registry: `~/.pynstal/interpreters.json`
//! - Global template store: `~/.pynstal/templates.json`
//! - Project override: `<project>/.pynstal/project.json`
//!
//! The global directory can be moved with `--config-dir` or `PYNSTAL_HOME`.
//!
//! # Example
//!
//! ```
//! use pynstal::config::{ConfigPaths, ConfigStore, InterpretersFile};
//! use tempfile::TempDir;
//!
//! let temp = TempDir::new().unwrap();
//! let store = ConfigStore::new(ConfigPaths::new(temp.path()));
//!
//! let mut file = store.load_interpreters().unwrap();
//! assert!(file.interpreters.is_empty());
//!
//! file.interpreters.push("/usr/bin/python3".to_string());
//! store.save_interpreters(&file).unwrap();
//! assert_eq!(store.load_interpreters().unwrap().interpreters.len(), 1);
//! ```

pub mod paths;
pub mod schema;
pub mod store;

pub use paths::{
    find_project_root, ConfigPaths, CONFIG_DIR_NAME, INTERPRETERS_FILE, PROJECT_FILE,
    TEMPLATES_FILE,
};
pub use schema::{InterpretersFile, ProjectFile, Template, TemplatesFile};
pub use store::{read_json, write_json_atomic, ConfigStore};

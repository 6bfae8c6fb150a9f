//! On-disk document types.
//!
//! These mirror the JSON files exactly. Paths are kept as strings here;
//! the interpreter registry turns them into [`InterpreterPath`]s.
//!
//! [`InterpreterPath`]: crate::interpreter::InterpreterPath

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// `interpreters.json`: registered interpreters and the global default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpretersFile {
    /// Registered interpreter paths, in registration order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub interpreters: Vec<String>,

    /// Global default interpreter.
    ///
    /// Older files wrote this as `default_interpreter`.
    #[serde(default, alias = "default_interpreter")]
    pub global_interpreter: Option<String>,
}

/// `templates.json`: named package templates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplatesFile {
    #[serde(default, deserialize_with = "null_as_default")]
    pub templates: BTreeMap<String, Template>,
}

/// `.pynstal/project.json`: per-project interpreter override.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFile {
    #[serde(default)]
    pub default_interpreter: Option<String>,
}

/// A package template: specifiers in install order plus extra pip arguments.
///
/// Reads both the object shape `{"packages": [...], "args": [...]}` and the
/// legacy bare array `["numpy", "pandas"]`; always writes the object shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TemplateRecord")]
pub struct Template {
    /// Package specifiers, in install order.
    pub packages: Vec<String>,

    /// Extra arguments appended to the install command.
    pub args: Vec<String>,
}

impl Template {
    /// Create a template from packages and arguments.
    pub fn new(packages: Vec<String>, args: Vec<String>) -> Self {
        Self { packages, args }
    }

    /// Whether this template carries extra installer arguments.
    pub fn has_args(&self) -> bool {
        !self.args.is_empty()
    }
}

/// Either on-disk template shape; object first, bare array as fallback.
#[derive(Deserialize)]
#[serde(untagged)]
enum TemplateRecord {
    Explicit {
        packages: Vec<String>,
        #[serde(default)]
        args: Vec<String>,
    },
    Legacy(Vec<String>),
}

impl From<TemplateRecord> for Template {
    fn from(record: TemplateRecord) -> Self {
        match record {
            TemplateRecord::Explicit { packages, args } => Self { packages, args },
            TemplateRecord::Legacy(packages) => Self {
                packages,
                args: Vec::new(),
            },
        }
    }
}

/// Treat an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

//! Interpreter registry.
//!
//! [`InterpreterDocument`] holds the registered paths and the global
//! default and enforces their invariants; [`InterpreterRegistry`] adds
//! validation, persistence and layered default resolution on top.

pub mod document;
pub mod path;
pub mod registry;

pub use document::InterpreterDocument;
pub use path::{absolute_path, InterpreterPath};
pub use registry::{
    AddedInterpreter, DefaultOrigin, InterpreterRegistry, MergeMode, MergeReport,
    ResolvedInterpreter, SelectFn,
};

//! Interpreter detection.
//!
//! Each [`CandidateStrategy`] lists plausible executables for one source;
//! [`InterpreterDetector`] runs them in order, removes files seen twice and
//! keeps only candidates that answer `--version` like CPython.

pub mod detector;
pub mod env;
pub mod probe;
pub mod strategies;
pub mod types;

pub use detector::InterpreterDetector;
pub use env::ProbeEnv;
pub use probe::{
    is_executable, is_interpreter_name, parse_python_version, validate_interpreter,
    ProcessVersionProbe, VersionProbe,
};
pub use strategies::{
    standard_strategies, CondaStrategy, PyenvStrategy, SearchPathStrategy, SystemStrategy,
};
pub use types::{CandidateStrategy, DetectedInterpreter, InterpreterSource, Platform};

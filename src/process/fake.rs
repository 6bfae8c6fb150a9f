//! Scripted executor standing in for a Python installation in tests.

use std::fs;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use super::{CommandSpec, ProcessExecutor, ProcessOutput};
use crate::detection::probe::test_support::create_fake_binary;
use crate::error::Result;

/// Pretends to be python: `--version` answers `Python 3.12.1`, `-m venv`
/// lays out an environment, `-m pip` succeeds unless a package named
/// `broken` is requested. Every call is recorded.
#[derive(Default)]
pub struct FakePython {
    calls: Mutex<Vec<CommandSpec>>,
}

impl FakePython {
    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }

    /// Recorded calls other than version probes.
    pub fn external_calls(&self) -> Vec<CommandSpec> {
        self.calls()
            .into_iter()
            .filter(|c| c.args != ["--version"])
            .collect()
    }
}

fn ok(stdout: &str) -> Result<ProcessOutput> {
    Ok(ProcessOutput::success(
        stdout.to_string(),
        String::new(),
        Duration::ZERO,
    ))
}

impl ProcessExecutor for FakePython {
    fn run(&self, spec: &CommandSpec) -> Result<ProcessOutput> {
        self.calls.lock().unwrap().push(spec.clone());
        let args: Vec<&str> = spec.args.iter().map(String::as_str).collect();
        match args.as_slice() {
            ["--version"] => ok("Python 3.12.1\n"),
            ["-m", "venv", dir] => {
                let root = Path::new(dir);
                create_fake_binary(&root.join("bin/python"));
                fs::write(root.join("pyvenv.cfg"), "home = /usr/bin\n").unwrap();
                ok("")
            }
            ["-m", "pip", "install", rest @ ..] if rest.contains(&"broken") => {
                Ok(ProcessOutput::failure(
                    Some(1),
                    String::new(),
                    "ERROR: No matching distribution found for broken\n".into(),
                    Duration::ZERO,
                ))
            }
            _ => ok(""),
        }
    }
}

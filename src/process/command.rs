//! External command execution.

use crate::error::{PynstalError, Result};
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

/// A program invocation: executable plus arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Executable to launch.
    pub program: PathBuf,

    /// Arguments passed verbatim.
    pub args: Vec<String>,
}

impl CommandSpec {
    /// Create a spec for the given program.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Render as a copy-pasteable command line.
    pub fn display(&self) -> String {
        std::iter::once(self.program.to_string_lossy().to_string())
            .chain(self.args.iter().cloned())
            .map(|part| quote(&part))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl std::fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

fn quote(part: &str) -> String {
    if part.is_empty() || part.chars().any(|c| c.is_whitespace() || c == '"') {
        format!("\"{}\"", part.replace('"', "\\\""))
    } else {
        part.to_string()
    }
}

/// Result of running a command.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether the command succeeded (exit code 0).
    pub success: bool,
}

impl ProcessOutput {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }

    /// Stdout and stderr joined, for tools that report on either stream.
    pub fn combined(&self) -> String {
        format!("{}{}", self.stdout, self.stderr)
    }
}

/// Output line from streaming execution.
#[derive(Debug, Clone)]
pub enum OutputLine {
    Stdout(String),
    Stderr(String),
}

/// Callback for streaming output.
pub type OutputCallback = Box<dyn Fn(OutputLine) + Send>;

/// Runs external programs.
///
/// Calls block until the child exits; there is no timeout.
pub trait ProcessExecutor {
    /// Run to completion, capturing stdout and stderr.
    fn run(&self, spec: &CommandSpec) -> Result<ProcessOutput>;

    /// Run to completion, forwarding each output line to `callback`.
    fn run_streaming(&self, spec: &CommandSpec, callback: OutputCallback) -> Result<ProcessOutput> {
        let output = self.run(spec)?;
        for line in output.stdout.lines() {
            callback(OutputLine::Stdout(line.to_string()));
        }
        for line in output.stderr.lines() {
            callback(OutputLine::Stderr(line.to_string()));
        }
        Ok(output)
    }
}

/// Executor backed by `std::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemExecutor;

impl SystemExecutor {
    fn command(spec: &CommandSpec) -> Command {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args);
        cmd.stdin(Stdio::null());
        cmd
    }
}

impl ProcessExecutor for SystemExecutor {
    fn run(&self, spec: &CommandSpec) -> Result<ProcessOutput> {
        let start = Instant::now();
        tracing::debug!("running {}", spec);

        let output = Self::command(spec)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()?;

        let duration = start.elapsed();
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if output.status.success() {
            Ok(ProcessOutput::success(stdout, stderr, duration))
        } else {
            Ok(ProcessOutput::failure(
                output.status.code(),
                stdout,
                stderr,
                duration,
            ))
        }
    }

    fn run_streaming(&self, spec: &CommandSpec, callback: OutputCallback) -> Result<ProcessOutput> {
        let start = Instant::now();
        tracing::debug!("running {} (streaming)", spec);

        let mut child = Self::command(spec)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let stdout = child.stdout.take().ok_or_else(|| {
            PynstalError::Other(anyhow::anyhow!("stdout of {} was not captured", spec))
        })?;
        let stderr = child.stderr.take().ok_or_else(|| {
            PynstalError::Other(anyhow::anyhow!("stderr of {} was not captured", spec))
        })?;

        let (tx, rx) = mpsc::channel();
        let tx_stdout = tx.clone();
        let tx_stderr = tx;

        let stdout_handle = thread::spawn(move || {
            let reader = BufReader::new(stdout);
            let mut output = String::new();
            for line in reader.lines().map_while(std::result::Result::ok) {
                output.push_str(&line);
                output.push('\n');
                let _ = tx_stdout.send(OutputLine::Stdout(line));
            }
            output
        });

        let stderr_handle = thread::spawn(move || {
            let reader = BufReader::new(stderr);
            let mut output = String::new();
            for line in reader.lines().map_while(std::result::Result::ok) {
                output.push_str(&line);
                output.push('\n');
                let _ = tx_stderr.send(OutputLine::Stderr(line));
            }
            output
        });

        for line in rx {
            callback(line);
        }

        let stdout_output = stdout_handle.join().unwrap_or_default();
        let stderr_output = stderr_handle.join().unwrap_or_default();
        let status = child.wait()?;
        let duration = start.elapsed();

        if status.success() {
            Ok(ProcessOutput::success(
                stdout_output,
                stderr_output,
                duration,
            ))
        } else {
            Ok(ProcessOutput::failure(
                status.code(),
                stdout_output,
                stderr_output,
                duration,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_quotes_arguments_with_spaces() {
        let spec = CommandSpec::new("/opt/My Python/python")
            .args(["-m", "venv"])
            .arg("/tmp/env");
        assert_eq!(spec.display(), "\"/opt/My Python/python\" -m venv /tmp/env");
    }

    #[test]
    fn builder_collects_args_in_order() {
        let spec = CommandSpec::new("python")
            .arg("-m")
            .args(vec!["pip".to_string(), "install".to_string()]);
        assert_eq!(spec.args, vec!["-m", "pip", "install"]);
    }

    #[test]
    fn combined_joins_both_streams() {
        let out = ProcessOutput::success("a\n".into(), "b\n".into(), Duration::ZERO);
        assert_eq!(out.combined(), "a\nb\n");
    }

    #[cfg(unix)]
    #[test]
    fn system_executor_captures_stdout() {
        let spec = CommandSpec::new("/bin/sh").args(["-c", "echo hello"]);
        let result = SystemExecutor.run(&spec).unwrap();
        assert!(result.success);
        assert_eq!(result.exit_code, Some(0));
        assert!(result.stdout.contains("hello"));
    }

    #[cfg(unix)]
    #[test]
    fn system_executor_reports_failure_code() {
        let spec = CommandSpec::new("/bin/sh").args(["-c", "echo oops >&2; exit 3"]);
        let result = SystemExecutor.run(&spec).unwrap();
        assert!(!result.success);
        assert_eq!(result.exit_code, Some(3));
        assert!(result.stderr.contains("oops"));
    }

    #[test]
    fn system_executor_missing_program_is_an_error() {
        let spec = CommandSpec::new("/nonexistent/pynstal-test/python");
        assert!(SystemExecutor.run(&spec).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn streaming_forwards_lines_from_both_streams() {
        use std::sync::{Arc, Mutex};

        let lines = Arc::new(Mutex::new(Vec::new()));
        let lines_clone = Arc::clone(&lines);
        let callback: OutputCallback = Box::new(move |line| {
            lines_clone.lock().unwrap().push(line);
        });

        let spec = CommandSpec::new("/bin/sh").args(["-c", "echo out; echo err >&2"]);
        let result = SystemExecutor.run_streaming(&spec, callback).unwrap();

        assert!(result.success);
        assert!(result.stdout.contains("out"));
        let captured = lines.lock().unwrap();
        assert!(captured.iter().any(|l| matches!(l, OutputLine::Stderr(s) if s == "err")));
        assert!(captured.iter().any(|l| matches!(l, OutputLine::Stdout(s) if s == "out")));
    }
}

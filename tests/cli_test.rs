//! Integration tests for the pynstal binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A workspace with its own config directory, isolated from the user's.
struct Workspace {
    temp: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("project")).unwrap();
        Self { temp }
    }

    fn config_dir(&self) -> PathBuf {
        self.temp.path().join("config")
    }

    fn project(&self) -> PathBuf {
        self.temp.path().join("project")
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::new(cargo_bin("pynstal"));
        cmd.current_dir(self.project())
            .env("PYNSTAL_HOME", self.config_dir())
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            .arg("--non-interactive");
        cmd
    }

    fn write_templates(&self, json: &str) {
        fs::create_dir_all(self.config_dir()).unwrap();
        fs::write(self.config_dir().join("templates.json"), json).unwrap();
    }
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("pynstal"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Python interpreter"))
        .stdout(predicate::str::contains("create-from-template"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("pynstal"));
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn cli_requires_a_subcommand() {
    let mut cmd = Command::new(cargo_bin("pynstal"));
    cmd.assert().failure().code(2);
}

#[test]
fn empty_interpreter_list() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["interpreter", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No interpreters registered"));
}

#[test]
fn template_lifecycle() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["template", "create", "web", "flask gunicorn"])
        .assert()
        .success()
        .stdout(predicate::str::contains("flask, gunicorn"));

    ws.cmd()
        .args(["template", "add-pkg", "web", "redis"])
        .assert()
        .success();

    let output = ws
        .cmd()
        .args(["template", "show", "web", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["packages"], serde_json::json!(["flask", "gunicorn", "redis"]));

    ws.cmd()
        .args(["template", "remove", "web"])
        .assert()
        .success();
    ws.cmd()
        .args(["template", "show", "web"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Template 'web' not found"));
}

#[test]
fn template_list_reads_legacy_shape() {
    let ws = Workspace::new();
    ws.write_templates(r#"{"templates": {"legacy": ["numpy", "pandas"]}}"#);

    ws.cmd()
        .args(["template", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("legacy"))
        .stdout(predicate::str::contains("numpy, pandas"));
}

#[test]
fn duplicate_template_fails() {
    let ws = Workspace::new();
    ws.cmd().args(["template", "create", "t", "a"]).assert().success();
    ws.cmd()
        .args(["template", "create", "t", "b"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn create_venv_without_any_default_fails() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["create-venv", ".venv"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("No interpreter specified"));
    assert!(!ws.project().join(".venv").exists());
}

#[test]
fn create_from_missing_template_touches_nothing() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["create-from-template", "missing-template", ".venv", "--interpreter", "/usr/bin/python3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing-template"));
    assert!(!ws.project().join(".venv").exists());
}

#[test]
fn remove_venv_refuses_unmanaged_directory() {
    let ws = Workspace::new();
    fs::create_dir_all(ws.project().join("data")).unwrap();
    ws.cmd()
        .args(["remove-venv", "data", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No virtual environment found"));
    assert!(ws.project().join("data").exists());
}

#[test]
fn completions_generate() {
    let mut cmd = Command::new(cargo_bin("pynstal"));
    cmd.args(["completions", "bash"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("pynstal"));
}

#[cfg(unix)]
mod with_fake_python {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    /// Shell stand-in for CPython covering `--version`, `-m venv` and `-m pip`.
    const FAKE_PYTHON: &str = r#"#!/bin/sh
if [ "$1" = "--version" ]; then
  echo "Python 3.11.7"
  exit 0
fi
if [ "$1" = "-m" ] && [ "$2" = "venv" ]; then
  mkdir -p "$3/bin"
  cp "$0" "$3/bin/python"
  chmod 755 "$3/bin/python"
  echo "home = /usr/bin" > "$3/pyvenv.cfg"
  exit 0
fi
if [ "$1" = "-m" ] && [ "$2" = "pip" ]; then
  shift 2
  echo "$0 $*" >> "$PIP_LOG"
  for arg in "$@"; do
    if [ "$arg" = "broken" ]; then
      echo "ERROR: No matching distribution found for broken" >&2
      exit 1
    fi
  done
  exit 0
fi
exit 2
"#;

    fn install_fake_python(dir: &Path) -> PathBuf {
        fs::create_dir_all(dir).unwrap();
        let path = dir.join("python3");
        fs::write(&path, FAKE_PYTHON).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    struct PythonWorkspace {
        ws: Workspace,
        python: PathBuf,
    }

    impl PythonWorkspace {
        fn new() -> Self {
            let ws = Workspace::new();
            let python = install_fake_python(&ws.temp.path().join("py/bin"));
            Self { ws, python }
        }

        fn cmd(&self) -> Command {
            let mut cmd = self.ws.cmd();
            cmd.env("PIP_LOG", self.pip_log());
            cmd
        }

        fn pip_log(&self) -> PathBuf {
            self.ws.temp.path().join("pip.log")
        }

        fn python(&self) -> &str {
            self.python.to_str().unwrap()
        }
    }

    #[test]
    fn add_list_and_default() {
        let pw = PythonWorkspace::new();
        pw.cmd()
            .args(["interpreter", "add", pw.python()])
            .assert()
            .success()
            .stdout(predicate::str::contains("Python 3.11.7"));

        pw.cmd()
            .args(["interpreter", "add", pw.python()])
            .assert()
            .failure()
            .stderr(predicate::str::contains("already registered"));

        pw.cmd()
            .args(["set-default-interpreter", pw.python()])
            .assert()
            .success();

        let output = pw.cmd().args(["interpreter", "list", "--json"]).output().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(value["interpreters"].as_array().unwrap().len(), 1);
        assert_eq!(value["global_default"], pw.python());
        assert_eq!(value["resolved_default"]["origin"], "global default");
    }

    #[test]
    fn non_python_is_rejected() {
        let pw = PythonWorkspace::new();
        let fake = pw.ws.temp.path().join("bin/ruby");
        fs::create_dir_all(fake.parent().unwrap()).unwrap();
        fs::write(&fake, "#!/bin/sh\necho ruby 3.2.0\n").unwrap();
        fs::set_permissions(&fake, fs::Permissions::from_mode(0o755)).unwrap();

        pw.cmd()
            .args(["interpreter", "add", fake.to_str().unwrap()])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Not a usable Python interpreter"));
    }

    #[test]
    fn dry_run_prints_and_creates_nothing() {
        let pw = PythonWorkspace::new();
        pw.cmd()
            .args(["create-venv", ".venv", "--dry-run", "--interpreter", pw.python()])
            .assert()
            .success()
            .stdout(predicate::str::contains("DRY RUN: would run:"))
            .stdout(predicate::str::contains("-m venv"));
        assert!(!pw.ws.project().join(".venv").exists());
        assert!(!pw.ws.config_dir().join("interpreters.json").exists());
    }

    #[test]
    fn create_from_template_installs_and_pins() {
        let pw = PythonWorkspace::new();
        pw.ws.write_templates(
            r#"{"templates": {"sci": {"packages": ["numpy", "pandas"], "args": ["--upgrade"]}}}"#,
        );

        pw.cmd()
            .args(["create-from-template", "sci", ".venv", "--interpreter", pw.python()])
            .assert()
            .success()
            .stdout(predicate::str::contains("source"));

        let venv = pw.ws.project().join(".venv");
        assert!(venv.join("pyvenv.cfg").exists());
        let log = fs::read_to_string(pw.pip_log()).unwrap();
        assert!(log.contains("install numpy pandas --upgrade"));
        assert!(log.contains(".venv/bin/python"));

        let project: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(pw.ws.project().join(".pynstal/project.json")).unwrap(),
        )
        .unwrap();
        assert!(project["default_interpreter"]
            .as_str()
            .unwrap()
            .ends_with(".venv/bin/python"));

        // Later installs resolve to the pinned environment.
        pw.cmd()
            .args(["install", "sci", "--dry-run"])
            .assert()
            .success()
            .stdout(predicate::str::contains(".venv/bin/python -m pip install numpy"));
    }

    #[test]
    fn failed_install_keeps_environment() {
        let pw = PythonWorkspace::new();
        pw.cmd()
            .args(["template", "create", "bad", "broken"])
            .assert()
            .success();

        pw.cmd()
            .args(["create-from-template", "bad", ".venv", "--interpreter", pw.python()])
            .assert()
            .failure()
            .code(1)
            .stderr(predicate::str::contains("No matching distribution"))
            .stderr(predicate::str::contains("pynstal install"));
        assert!(pw.ws.project().join(".venv/pyvenv.cfg").exists());
    }

    #[test]
    fn remove_venv_deletes_and_unpins() {
        let pw = PythonWorkspace::new();
        pw.cmd()
            .args(["create-venv", ".venv", "--interpreter", pw.python()])
            .assert()
            .success();

        pw.cmd()
            .args(["remove-venv", ".venv", "--yes"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Removed"));
        assert!(!pw.ws.project().join(".venv").exists());

        pw.cmd()
            .args(["create-venv", "again", "--dry-run"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("No interpreter specified"));
    }

    #[test]
    fn directory_flag_changes_working_directory() {
        let pw = PythonWorkspace::new();
        let other = pw.ws.temp.path().join("other");
        fs::create_dir_all(&other).unwrap();

        pw.cmd()
            .args(["interpreter", "add", pw.python()])
            .assert()
            .success();
        pw.cmd()
            .args(["-C", other.to_str().unwrap(), "set-default-interpreter", "--project", pw.python()])
            .assert()
            .success();
        assert!(other.join(".pynstal/project.json").exists());
        assert!(!pw.ws.project().join(".pynstal").exists());
    }
}

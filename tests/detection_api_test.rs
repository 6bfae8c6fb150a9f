//! Integration tests for interpreter detection.
#![cfg(unix)]

use pynstal::detection::{
    parse_python_version, InterpreterDetector, InterpreterSource, Platform, ProbeEnv,
    VersionProbe,
};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// Treats anything whose name starts with `python` as Python 3.12.
struct AnyPython;

impl VersionProbe for AnyPython {
    fn python_version(&self, path: &Path) -> Option<String> {
        let name = path.file_name()?.to_str()?;
        name.starts_with("python").then(|| "3.12.4".to_string())
    }
}

fn fake_binary(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "#!/bin/sh\n").unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

#[test]
fn finds_interpreters_from_every_source() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fake_binary(&root.join("usr/bin/python3"));
    fake_binary(&root.join("home/.pyenv/versions/3.11.9/bin/python3.11"));
    fake_binary(&root.join("home/miniconda3/bin/python"));
    fake_binary(&root.join("home/miniconda3/envs/ml/bin/python"));
    fake_binary(&root.join("tools/python3"));

    let env = ProbeEnv::new(Platform::Posix)
        .with_home(root.join("home"))
        .with_system_dirs(vec![root.join("usr/bin")])
        .with_search_path(vec![root.join("tools")]);
    let found = InterpreterDetector::new(env, Arc::new(AnyPython)).detect();

    let sources: Vec<InterpreterSource> = found.iter().map(|d| d.source).collect();
    assert_eq!(
        sources,
        vec![
            InterpreterSource::System,
            InterpreterSource::Pyenv,
            InterpreterSource::Conda,
            InterpreterSource::Conda,
            InterpreterSource::Path,
        ]
    );
    assert!(found.iter().all(|d| d.version == "3.12.4"));
}

#[test]
fn same_file_through_symlink_is_reported_once() {
    let temp = TempDir::new().unwrap();
    let real = temp.path().join("usr/bin/python3.12");
    fake_binary(&real);
    fs::create_dir_all(temp.path().join("bin")).unwrap();
    std::os::unix::fs::symlink(&real, temp.path().join("bin/python3")).unwrap();

    let env = ProbeEnv::new(Platform::Posix)
        .with_system_dirs(vec![temp.path().join("usr/bin")])
        .with_search_path(vec![temp.path().join("bin")]);
    let found = InterpreterDetector::new(env, Arc::new(AnyPython)).detect();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].source, InterpreterSource::System);
}

#[test]
fn broken_candidates_are_dropped_silently() {
    let temp = TempDir::new().unwrap();
    let bin = temp.path().join("bin");
    fake_binary(&bin.join("python3"));
    fs::write(bin.join("python3.9"), "not executable").unwrap();

    struct Refuses;
    impl VersionProbe for Refuses {
        fn python_version(&self, _: &Path) -> Option<String> {
            None
        }
    }

    let env = ProbeEnv::new(Platform::Posix).with_system_dirs(vec![bin.clone()]);
    assert!(InterpreterDetector::new(env.clone(), Arc::new(Refuses))
        .detect()
        .is_empty());

    let found = InterpreterDetector::new(env, Arc::new(AnyPython)).detect();
    assert_eq!(found.len(), 1);
    assert!(found[0].path.as_path().ends_with("python3"));
}

#[test]
fn empty_machine_detects_nothing() {
    let env = ProbeEnv::new(Platform::Posix);
    assert!(InterpreterDetector::new(env, Arc::new(AnyPython))
        .detect()
        .is_empty());
}

#[test]
fn version_banner_parsing() {
    assert_eq!(parse_python_version("Python 3.12.1\n").as_deref(), Some("3.12.1"));
    assert_eq!(parse_python_version("Python 3.13.0rc2").as_deref(), Some("3.13.0rc2"));
    assert_eq!(parse_python_version("ruby 3.2.0"), None);
}

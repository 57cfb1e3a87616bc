//! Tests for command dispatch and exit codes

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;

use ptree::cli::{execute_command, run, Cli};
use ptree::config::Settings;
use ptree::exitcode;
use ptree::infrastructure::di::ServiceContainer;
use ptree::infrastructure::traits::ProcFs;
use tempfile::TempDir;

fn resources(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/resources")
        .join(name)
}

/// Run `args` against the fixture root, returning (exit code, stdout)
fn run_fixture(fixture: &str, args: &[&str]) -> (i32, String) {
    let cli = Cli::try_parse_from(std::iter::once("ptree").chain(args.iter().copied()))
        .expect("valid arguments");
    let settings = Settings::default().with_proc_root(resources(fixture));
    let container = ServiceContainer::new(&settings);
    let mut out = Vec::new();
    let code = match run(&container, &cli, cli.pid.unwrap(), &mut out) {
        Ok(code) => code,
        Err(e) => e.exit_code(),
    };
    (code, String::from_utf8(out).unwrap())
}

#[test]
fn given_degraded_tree_when_running_then_prints_and_exits_ok() {
    let (code, stdout) = run_fixture("proc_scenario", &["-q", "1"]);

    assert_eq!(code, exitcode::OK);
    assert_eq!(stdout, "1: init\n  2: \n");
}

#[test]
fn given_degraded_tree_with_strict_when_running_then_dataerr() {
    let (code, stdout) = run_fixture("proc_scenario", &["-q", "--strict", "1"]);

    assert_eq!(code, exitcode::DATAERR);
    assert_eq!(stdout, "1: init\n  2: \n");
}

#[test]
fn given_clean_tree_with_strict_when_running_then_ok() {
    let (code, _) = run_fixture("proc_deep", &["--strict", "10"]);

    assert_eq!(code, exitcode::OK);
}

#[test]
fn given_unknown_pid_when_running_then_noinput_and_no_output() {
    let (code, stdout) = run_fixture("proc_scenario", &["3"]);

    assert_eq!(code, exitcode::NOINPUT);
    assert!(stdout.is_empty());
}

#[test]
fn given_depth_and_tree_format_when_running_then_bounded_box_output() {
    let (code, stdout) = run_fixture("proc_deep", &["-d", "1", "-f", "tree", "10"]);

    assert_eq!(code, exitcode::OK);
    assert!(stdout.starts_with("10: /sbin/init\n"));
    assert_eq!(stdout.lines().count(), 3);
}

#[test]
fn given_args_flag_when_running_then_prints_full_command_lines() {
    let (_, stdout) = run_fixture("proc_deep", &["-a", "-d", "1", "10"]);

    assert_eq!(stdout, "10: /sbin/init splash\n  20: sshd -D\n  21: cron\n");
}

#[cfg(target_os = "linux")]
#[test]
fn given_child_with_unreadable_cmdline_when_running_then_prints_tree_and_exits_ok() {
    // Arrange: 2/cmdline is a directory, it opens but cannot be read
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("1/task/1")).unwrap();
    fs::write(temp.path().join("1/exe"), "").unwrap();
    fs::write(temp.path().join("1/cmdline"), "init\0").unwrap();
    fs::write(temp.path().join("1/task/1/children"), "2").unwrap();
    fs::create_dir_all(temp.path().join("2/cmdline")).unwrap();
    fs::create_dir_all(temp.path().join("2/task/2")).unwrap();
    fs::write(temp.path().join("2/exe"), "").unwrap();
    fs::write(temp.path().join("2/task/2/children"), "").unwrap();
    let container = ServiceContainer::with_deps(Arc::new(ProcFs::new(temp.path())));
    let cli = Cli::try_parse_from(["ptree", "-q", "1"]).unwrap();
    let mut out = Vec::new();

    // Act
    let code = run(&container, &cli, 1, &mut out).unwrap();

    // Assert
    assert_eq!(code, exitcode::OK);
    assert_eq!(String::from_utf8(out).unwrap(), "1: init\n  2: \n");
}

#[test]
fn given_completions_when_executing_then_writes_script() {
    let cli = Cli::try_parse_from(["ptree", "--completions", "bash"]).unwrap();
    let mut out = Vec::new();

    let code = execute_command(&cli, &mut out).unwrap();

    assert_eq!(code, exitcode::OK);
    assert!(String::from_utf8(out).unwrap().contains("ptree"));
}

//! Integration Tests

mod workdir;

use std::fs;

use crate::workdir::{stderr, stdout, WorkDir};

/// Splits a `[pid] command status` line.
fn parse_status_line(line: &str) -> (i32, String) {
    assert!(line.starts_with('['), "not a status line: {:?}", line);
    let end = line.find(']').expect("closing bracket");
    let pid = line[1..end].parse().expect("numeric pid");
    (pid, line[end + 1..].trim().to_string())
}

#[test]
fn test_background_job_is_listed_until_reported_once() {
    let work_dir = WorkDir::new("background");
    let output = work_dir.run_script("sleep 1 &\njobs\nsleep 2\njobs\n");
    assert!(output.status.success(), "{}", stderr(&output));

    let stdout = stdout(&output);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3, "{}", stdout);

    let (pid, launched) = parse_status_line(lines[0]);
    assert_eq!(launched, "sleep 1 Running");
    assert_eq!(parse_status_line(lines[1]), (pid, "sleep 1 Running".to_string()));
    assert_eq!(
        parse_status_line(lines[2]),
        (pid, "sleep 1 Terminated (exit status 0)".to_string())
    );
}

#[test]
fn test_nonexistent_foreground_program() {
    let work_dir = WorkDir::new("not-found");
    let output = work_dir.run_script("jsh-no-such-program --version\njobs\n");
    assert!(output.status.success());
    assert_eq!(stdout(&output), "");
    assert!(stderr(&output).contains("jsh: jsh-no-such-program: command not found"));
}

#[test]
fn test_only_the_finished_background_job_is_removed() {
    let work_dir = WorkDir::new("two-jobs");
    let output = work_dir.run_script("sleep 0.2 &\nsleep 2 &\nsleep 1\njobs\n");
    assert!(output.status.success());

    let stdout = stdout(&output);
    let lines: Vec<(i32, String)> = stdout.lines().map(parse_status_line).collect();
    assert_eq!(lines.len(), 4, "{}", stdout);
    let (first, second) = (lines[0].0, lines[1].0);
    assert_ne!(first, second);
    assert_eq!(lines[0].1, "sleep 0.2 Running");
    assert_eq!(lines[1].1, "sleep 2 Running");
    assert_eq!(lines[2], (first, "sleep 0.2 Terminated (exit status 0)".to_string()));
    assert_eq!(lines[3], (second, "sleep 2 Running".to_string()));
}

#[test]
fn test_cd() {
    let work_dir = WorkDir::new("cd");
    let output = work_dir.run_script("cd\npwd\ncd /does/not/exist\npwd\n");
    assert!(output.status.success());

    let home = fs::canonicalize(work_dir.home()).unwrap();
    let expected = format!("{0}\n{0}\n", home.display());
    assert_eq!(stdout(&output), expected);
    assert!(stderr(&output).contains("jsh: cd: /does/not/exist: "));
}

#[test]
fn test_cd_to_directory() {
    let work_dir = WorkDir::new("cd-dir");
    fs::create_dir(work_dir.path().join("sub")).unwrap();
    let output = work_dir.run_script("cd sub\npwd\n");
    assert!(output.status.success());

    let sub = fs::canonicalize(work_dir.path().join("sub")).unwrap();
    assert_eq!(stdout(&output), format!("{}\n", sub.display()));
}

#[test]
fn test_exit_leaves_background_jobs_behind() {
    let work_dir = WorkDir::new("exit");
    let output = work_dir.run_script("sleep 1 &\nexit\necho unreachable\n");
    assert_eq!(output.status.code(), Some(0));

    let stdout = stdout(&output);
    assert_eq!(stdout.lines().count(), 1, "{}", stdout);
    assert!(stdout.ends_with(" sleep 1 Running\n"));
}

#[test]
fn test_end_of_input_exits_successfully() {
    let work_dir = WorkDir::new("eof");
    let output = work_dir.run_script("false\n");
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn test_exit_status_from_command_string() {
    let work_dir = WorkDir::new("exit-status");
    let output = work_dir.command(&["-c", "exit 85"]).output().unwrap();
    assert_eq!(output.status.code(), Some(85));

    let output = work_dir.command(&["-c", "exit -244"]).output().unwrap();
    assert_eq!(output.status.code(), Some(12));
}

#[test]
fn test_script_file() {
    let work_dir = WorkDir::new("script");
    let script = work_dir.path().join("script.jsh");
    fs::write(&script, "echo from script\nexit 4\n").unwrap();

    let output = work_dir.command(&[&script]).output().unwrap();
    assert_eq!(output.status.code(), Some(4));
    assert_eq!(stdout(&output), "from script\n");
}

#[test]
fn test_help_and_syntax_errors_keep_the_shell_running() {
    let work_dir = WorkDir::new("help");
    let output = work_dir.run_script("sleep & 1\nhelp\n");
    assert!(output.status.success());
    assert_eq!(stdout(&output), "exit [n]\nhelp\ncd [dir]\njobs\n");
    assert!(stderr(&output).contains("jsh: syntax error near: 'sleep & 1'"));
}

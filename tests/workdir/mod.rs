use std::ffi::OsStr;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{self, Command, Stdio};

use tempdir::TempDir;

/// WorkDir represents a directory in which tests are run.
#[derive(Debug)]
pub struct WorkDir {
    /// The directory in which the shell will run.
    dir: TempDir,
    /// Used as $HOME, so history and log files stay out of the real one.
    home: TempDir,
}

impl WorkDir {
    /// Creates fresh working and home directories.
    pub fn new(name: &str) -> WorkDir {
        WorkDir {
            dir: TempDir::new(&format!("jsh-{}-cwd", name)).expect("create working dir"),
            home: TempDir::new(&format!("jsh-{}-home", name)).expect("create home dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn home(&self) -> &Path {
        self.home.path()
    }

    /// Builds a new command to run the shell in this working directory.
    pub fn command<I, S>(&self, args: I) -> process::Command
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = Command::new(self.bin());
        cmd.current_dir(self.path());
        cmd.env("HOME", self.home());
        cmd.args(args);
        cmd
    }

    /// Returns path to executable.
    fn bin(&self) -> PathBuf {
        PathBuf::from(env!("CARGO_BIN_EXE_jsh"))
    }

    /// Runs the shell non-interactively, feeding `script` on its stdin.
    pub fn run_script(&self, script: &str) -> process::Output {
        let mut child = self
            .command(&["--log", "jsh.log"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("failed to spawn jsh");
        child
            .stdin
            .take()
            .expect("stdin is piped")
            .write_all(script.as_bytes())
            .expect("failed to write script");
        child.wait_with_output().expect("failed to wait on jsh")
    }
}

pub fn stdout(output: &process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

use std::fmt;

use nix::{sys::signal::Signal, unistd::Pid};

/// How the shell treats a job it launched.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Mode {
    /// The shell blocks until the job terminates or stops.
    Foreground,
    /// The shell returns to the prompt immediately.
    Background,
}

/// How a process ended.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Disposition {
    Exited(i32),
    Signaled(Signal),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum JobStatus {
    Running,
    Stopped,
    /// Transient: a terminated job is reported and removed in the same pass.
    Terminated(Disposition),
}

impl JobStatus {
    pub fn is_terminated(self) -> bool {
        match self {
            JobStatus::Terminated(_) => true,
            _ => false,
        }
    }
}

impl Default for JobStatus {
    fn default() -> Self {
        JobStatus::Running
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            JobStatus::Running => write!(f, "Running"),
            JobStatus::Stopped => write!(f, "Stopped"),
            JobStatus::Terminated(Disposition::Exited(code)) => {
                write!(f, "Terminated (exit status {})", code)
            }
            JobStatus::Terminated(Disposition::Signaled(signal)) => {
                write!(f, "Terminated (signal {})", signal)
            }
        }
    }
}

/// A launched external program.
///
/// The job owns the argument vector it was launched with; dropping the job
/// releases it.
#[derive(Clone, PartialEq)]
pub struct Job {
    pid: Pid,
    argv: Vec<String>,
    status: JobStatus,
    mode: Mode,
}

impl Job {
    pub fn new(pid: Pid, argv: Vec<String>, status: JobStatus, mode: Mode) -> Self {
        Self {
            pid,
            argv,
            status,
            mode,
        }
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    /// The command line, as displayed to the user.
    pub fn input(&self) -> String {
        self.argv.join(" ")
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub(crate) fn set_status(&mut self, status: JobStatus) {
        self.status = status;
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_stopped(&self) -> bool {
        self.status == JobStatus::Stopped
    }

    pub fn is_terminated(&self) -> bool {
        self.status.is_terminated()
    }
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pid: {}\tinput: {}\tstatus: {:?}\tmode: {:?}",
            self.pid,
            self.input(),
            self.status,
            self.mode
        )
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} {}", self.pid, self.input(), self.status)
    }
}

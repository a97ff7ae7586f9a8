//! Waiting on launched jobs and reporting their state changes.

use std::io::Write;

use failure::{Fail, ResultExt};
use log::{debug, warn};
use nix::{
    errno::Errno,
    sys::{
        signal::{self, SigHandler},
        wait::{self, WaitPidFlag, WaitStatus},
    },
    unistd::Pid,
};

use crate::{
    core::{
        job::{Disposition, JobStatus},
        job_table::JobTable,
    },
    errors::{ErrorKind, Result},
    shell::execute_command::JOB_CONTROL_SIGNALS,
};

/// Ignore terminal-generated job-control signals so that they only affect
/// the foreground job.
pub fn initialize_job_control() -> Result<()> {
    for &sig in &JOB_CONTROL_SIGNALS {
        unsafe { signal::signal(sig, SigHandler::SigIgn) }.context(ErrorKind::Nix)?;
    }

    debug!("ignoring job control signals");
    Ok(())
}

/// Blocks until `pid` terminates or stops.
///
/// A failing wait means the job table and the operating system disagree about
/// our children, so the error is fatal.
pub fn wait_for_foreground(pid: Pid) -> Result<JobStatus> {
    loop {
        match wait::waitpid(pid, Some(WaitPidFlag::WUNTRACED)) {
            Ok(wait_status) => {
                if let Some(status) = translate_wait_status(wait_status) {
                    debug!("foreground job [{}] is now {:?}", pid, status);
                    if status != JobStatus::Running {
                        return Ok(status);
                    }
                }
            }
            Err(Errno::EINTR) => continue,
            Err(e) => return Err(e.context(ErrorKind::Wait(pid)).into()),
        }
    }
}

/// Checks for a state change of `pid` without blocking.
///
/// Returns `None` if nothing changed since the last check.
pub fn try_wait(pid: Pid) -> nix::Result<Option<JobStatus>> {
    let options = WaitPidFlag::WNOHANG | WaitPidFlag::WUNTRACED | WaitPidFlag::WCONTINUED;
    match wait::waitpid(pid, Some(options)) {
        Ok(wait_status) => Ok(translate_wait_status(wait_status)),
        Err(Errno::EINTR) => Ok(None),
        Err(e) => Err(e),
    }
}

fn translate_wait_status(wait_status: WaitStatus) -> Option<JobStatus> {
    match wait_status {
        WaitStatus::Exited(_, code) => Some(JobStatus::Terminated(Disposition::Exited(code))),
        WaitStatus::Signaled(_, signal, _) => {
            Some(JobStatus::Terminated(Disposition::Signaled(signal)))
        }
        WaitStatus::Stopped(..) => Some(JobStatus::Stopped),
        WaitStatus::Continued(_) => Some(JobStatus::Running),
        _ => None,
    }
}

/// Notify the user about stopped or terminated jobs and remove terminated
/// jobs from the job table.
///
/// Every job is polled once. A terminated job is reported exactly once, by
/// the pass that first observes its termination.
pub fn do_job_notification(jobs: &mut JobTable, stdout: &mut dyn Write) -> Result<()> {
    jobs.iterate(|jobs, pid| {
        let status = match try_wait(pid) {
            Ok(Some(status)) => status,
            Ok(None) => return Ok(()),
            Err(Errno::ECHILD) => {
                warn!("[{}] can no longer be waited on, forgetting it", pid);
                jobs.delete(pid)?;
                return Ok(());
            }
            Err(e) => {
                warn!("failed to check on [{}]: {}", pid, e);
                return Ok(());
            }
        };

        let previous = jobs.get(pid).map(|job| job.status());
        jobs.set_status(pid, status)?;
        match status {
            JobStatus::Terminated(_) => {
                let job = jobs.delete(pid)?;
                writeln!(stdout, "{}", job).context(ErrorKind::Io)?;
            }
            JobStatus::Stopped if previous != Some(JobStatus::Stopped) => {
                if let Some(job) = jobs.get(pid) {
                    writeln!(stdout, "{}", job).context(ErrorKind::Io)?;
                }
            }
            JobStatus::Running if previous == Some(JobStatus::Stopped) => {
                debug!("[{}] was continued", pid);
            }
            _ => {}
        }

        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::{Duration, Instant};

    use nix::sys::signal::{kill, Signal};

    use crate::core::job::Mode;
    use crate::shell::execute_command::launch;

    fn argv(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn spawn_background(jobs: &mut JobTable, words: &[&str]) -> Pid {
        let argv = argv(words);
        let pid = launch(&argv, Mode::Background).unwrap();
        jobs.save(pid, argv, JobStatus::Running, Mode::Background)
            .unwrap();
        pid
    }

    /// Sweeps until `done` holds, collecting everything the sweeps printed.
    fn sweep_until<F>(jobs: &mut JobTable, done: F) -> String
    where
        F: Fn(&JobTable) -> bool,
    {
        let deadline = Instant::now() + Duration::from_secs(10);
        let mut output = Vec::new();
        while !done(&*jobs) {
            assert!(Instant::now() < deadline, "timed out waiting for jobs");
            do_job_notification(jobs, &mut output).unwrap();
            thread::sleep(Duration::from_millis(10));
        }
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_sweep_leaves_running_jobs_alone() {
        let mut jobs = JobTable::new();
        let pid = spawn_background(&mut jobs, &["sleep", "5"]);

        let mut output = Vec::new();
        do_job_notification(&mut jobs, &mut output).unwrap();
        assert!(output.is_empty());
        assert_eq!(jobs.get(pid).unwrap().status(), JobStatus::Running);

        kill(pid, Signal::SIGKILL).unwrap();
        let output = sweep_until(&mut jobs, JobTable::is_empty);
        assert_eq!(
            output,
            format!("[{}] sleep 5 Terminated (signal SIGKILL)\n", pid)
        );
    }

    #[test]
    fn test_terminated_job_is_reported_once_and_removed() {
        let mut jobs = JobTable::new();
        let pid = spawn_background(&mut jobs, &["sh", "-c", "exit 4"]);

        let output = sweep_until(&mut jobs, JobTable::is_empty);
        assert_eq!(
            output,
            format!("[{}] sh -c exit 4 Terminated (exit status 4)\n", pid)
        );

        let mut output = Vec::new();
        do_job_notification(&mut jobs, &mut output).unwrap();
        assert!(output.is_empty());
    }

    #[test]
    fn test_only_finished_job_is_removed() {
        let mut jobs = JobTable::new();
        let quick = spawn_background(&mut jobs, &["true"]);
        let slow = spawn_background(&mut jobs, &["sleep", "5"]);

        let output = sweep_until(&mut jobs, |jobs| !jobs.contains(quick));
        assert_eq!(
            output,
            format!("[{}] true Terminated (exit status 0)\n", quick)
        );
        assert!(jobs.contains(slow));
        assert_eq!(jobs.len(), 1);

        kill(slow, Signal::SIGKILL).unwrap();
        sweep_until(&mut jobs, JobTable::is_empty);
    }

    #[test]
    fn test_stop_and_continue_are_tracked() {
        let mut jobs = JobTable::new();
        let pid = spawn_background(&mut jobs, &["sleep", "5"]);

        kill(pid, Signal::SIGSTOP).unwrap();
        let output = sweep_until(&mut jobs, |jobs| {
            jobs.get(pid).map_or(false, |job| job.is_stopped())
        });
        assert_eq!(output, format!("[{}] sleep 5 Stopped\n", pid));

        // Stopped jobs stay listed and are not reported again.
        let mut output = Vec::new();
        do_job_notification(&mut jobs, &mut output).unwrap();
        assert!(output.is_empty());
        assert!(jobs.contains(pid));

        kill(pid, Signal::SIGCONT).unwrap();
        sweep_until(&mut jobs, |jobs| {
            jobs.get(pid).map(|job| job.status()) == Some(JobStatus::Running)
        });

        kill(pid, Signal::SIGKILL).unwrap();
        sweep_until(&mut jobs, JobTable::is_empty);
    }

    #[test]
    fn test_foreground_wait_reports_stop() {
        let pid = launch(&argv(&["sh", "-c", "kill -STOP $$"]), Mode::Foreground).unwrap();
        assert_eq!(wait_for_foreground(pid).unwrap(), JobStatus::Stopped);

        kill(pid, Signal::SIGKILL).unwrap();
        assert_eq!(
            wait_for_foreground(pid).unwrap(),
            JobStatus::Terminated(Disposition::Signaled(Signal::SIGKILL))
        );
    }

    #[test]
    fn test_foreground_wait_on_unknown_child_is_fatal() {
        let err = wait_for_foreground(Pid::from_raw(i32::MAX)).unwrap_err();
        assert_eq!(*err.kind(), ErrorKind::Wait(Pid::from_raw(i32::MAX)));
        assert!(err.is_fatal());
    }
}

//! Launching external programs.

use std::ffi::CString;
use std::io::{self, Write};

use failure::{Fail, ResultExt};
use log::debug;
use nix::{
    errno::Errno,
    libc,
    sys::signal::{self, SigHandler, Signal},
    unistd::{self, ForkResult, Pid},
};

use crate::{
    core::job::Mode,
    errors::{ErrorKind, Result},
};

/// Exit status of a child whose program could not be found.
pub const COMMAND_NOT_FOUND_EXIT_STATUS: i32 = 127;
/// Exit status of a child whose program was found but could not be executed.
pub const COMMAND_NOT_EXECUTABLE_EXIT_STATUS: i32 = 126;

/// Signals the interactive shell ignores and its children must not.
pub(crate) const JOB_CONTROL_SIGNALS: [Signal; 5] = [
    Signal::SIGINT,
    Signal::SIGQUIT,
    Signal::SIGTSTP,
    Signal::SIGTTIN,
    Signal::SIGTTOU,
];

/// Forks and execs `argv[0]` with `argv` as its arguments.
///
/// Returns the child's pid as soon as the fork succeeds; whether the program
/// could actually be executed is only visible later, as the child's exit
/// status. A failed fork is fatal to the shell.
///
/// `argv` must not be empty.
pub fn launch(argv: &[String], mode: Mode) -> Result<Pid> {
    // Everything the child needs is allocated before forking.
    let c_argv = argv
        .iter()
        .map(|arg| {
            CString::new(arg.as_bytes()).context(ErrorKind::InvalidArgument(arg.clone()))
        })
        .collect::<::std::result::Result<Vec<_>, _>>()?;
    let not_found_message = format!("jsh: {}: command not found\n", argv[0]);
    let error_prefix = format!("jsh: {}: ", argv[0]);

    // Pending output would otherwise be flushed twice, once by each process.
    let temp_result = io::stdout().flush();
    log_if_err!(temp_result, "failed to flush stdout before fork");

    match unsafe { unistd::fork() } {
        Ok(ForkResult::Parent { child }) => {
            debug!("forked {} for {:?} ({:?})", child, argv, mode);
            Ok(child)
        }
        Ok(ForkResult::Child) => exec_child(&c_argv, mode, &not_found_message, &error_prefix),
        Err(e) => Err(e.context(ErrorKind::Fork).into()),
    }
}

/// Runs in the forked child; never returns to the shell's code.
///
/// Only async-signal-safe calls happen here, so both diagnostics are
/// formatted by the parent.
fn exec_child(argv: &[CString], mode: Mode, not_found_message: &str, error_prefix: &str) -> ! {
    if mode == Mode::Background {
        // Keep terminal-generated signals meant for the foreground away from
        // background jobs.
        let _ = unistd::setpgid(Pid::from_raw(0), Pid::from_raw(0));
    }

    for &sig in &JOB_CONTROL_SIGNALS {
        let _ = unsafe { signal::signal(sig, SigHandler::SigDfl) };
    }

    let err = match unistd::execvp(&argv[0], argv) {
        Ok(never) => match never {},
        Err(e) => e,
    };

    let code = match err {
        Errno::ENOENT => {
            let _ = unistd::write(libc::STDERR_FILENO, not_found_message.as_bytes());
            COMMAND_NOT_FOUND_EXIT_STATUS
        }
        e => {
            let _ = unistd::write(libc::STDERR_FILENO, error_prefix.as_bytes());
            let _ = unistd::write(libc::STDERR_FILENO, e.desc().as_bytes());
            let _ = unistd::write(libc::STDERR_FILENO, b"\n");
            COMMAND_NOT_EXECUTABLE_EXIT_STATUS
        }
    };

    // Skip exit handlers and buffered output that belong to the shell.
    unsafe { libc::_exit(code) }
}

//! Error module. See the [failure](https://crates.io/crates/failure) crate for details.

use std::fmt;
use std::result;

use failure::{Backtrace, Context, Fail};
use nix::unistd::Pid;

pub type Result<T> = result::Result<T, Error>;

#[derive(Debug)]
pub struct Error {
    ctx: Context<ErrorKind>,
}

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.ctx.get_context()
    }

    /// Errors after which the job table can no longer be trusted to match
    /// the operating system's view of our children.
    pub fn is_fatal(&self) -> bool {
        match *self.kind() {
            ErrorKind::Fork
            | ErrorKind::Wait(_)
            | ErrorKind::DuplicateJob(_)
            | ErrorKind::NoSuchJob(_) => true,
            _ => false,
        }
    }

    pub(crate) fn syntax<T: AsRef<str>>(line: T) -> Error {
        Error::from(ErrorKind::Syntax(line.as_ref().to_string()))
    }

    pub(crate) fn builtin_command<T: AsRef<str>>(message: T, code: i32) -> Error {
        Error::from(ErrorKind::BuiltinCommand {
            message: message.as_ref().to_string(),
            code,
        })
    }

    pub(crate) fn duplicate_job(pid: Pid) -> Error {
        Error::from(ErrorKind::DuplicateJob(pid))
    }

    pub(crate) fn no_such_job(pid: Pid) -> Error {
        Error::from(ErrorKind::NoSuchJob(pid))
    }
}

impl Fail for Error {
    fn cause(&self) -> Option<&dyn Fail> {
        self.ctx.cause()
    }

    fn backtrace(&self) -> Option<&Backtrace> {
        self.ctx.backtrace()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ctx.cause() {
            Some(cause) => write!(f, "{}: {}", self.ctx, cause),
            None => self.ctx.fmt(f),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Syntax(String),
    BuiltinCommand { message: String, code: i32 },
    InvalidArgument(String),
    /// An input line that is not valid UTF-8; the line is skipped.
    InvalidUtf8,
    DuplicateJob(Pid),
    NoSuchJob(Pid),
    Fork,
    Wait(Pid),
    Io,
    Nix,
    Readline,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ErrorKind::Syntax(ref line) => write!(f, "syntax error near: '{}'", line),
            ErrorKind::BuiltinCommand { ref message, .. } => write!(f, "{}", message),
            ErrorKind::InvalidArgument(ref arg) => write!(f, "{:?}: invalid argument", arg),
            ErrorKind::InvalidUtf8 => write!(f, "input line is not valid UTF-8"),
            ErrorKind::DuplicateJob(pid) => write!(f, "[{}]: job already exists", pid),
            ErrorKind::NoSuchJob(pid) => write!(f, "[{}]: no such job", pid),
            ErrorKind::Fork => write!(f, "fork failed"),
            ErrorKind::Wait(pid) => write!(f, "wait failed for process {}", pid),
            ErrorKind::Io => write!(f, "I/O error occurred"),
            ErrorKind::Nix => write!(f, "Nix error occurred"),
            ErrorKind::Readline => write!(f, "Readline error occurred"),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error::from(Context::new(kind))
    }
}

impl From<Context<ErrorKind>> for Error {
    fn from(ctx: Context<ErrorKind>) -> Error {
        Error { ctx }
    }
}

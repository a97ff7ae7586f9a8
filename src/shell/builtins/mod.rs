//! Jsh builtins
//!
//! Commands the shell runs itself because they need the shell's own state:
//! its job table, its working directory or its lifetime.

use std::io::Write;

use crate::{core::job_table::JobTable, errors::Result, shell::Flow};

use self::dirs::Cd;
use self::exit::Exit;
use self::help::Help;
use self::jobs::Jobs;

mod dirs;
mod exit;
mod help;
mod jobs;

const CD_NAME: &str = "cd";
const EXIT_NAME: &str = "exit";
const HELP_NAME: &str = "help";
const JOBS_NAME: &str = "jobs";

/// Represents a Jsh builtin command such as cd or help.
pub trait BuiltinCommand {
    /// The NAME of the command.
    const NAME: &'static str;
    /// The help string to display to the user.
    const HELP: &'static str;
    /// The usage string to display to the user.
    fn usage() -> &'static str {
        Self::HELP.lines().next().unwrap_or(Self::NAME)
    }
    /// Runs the command with the given arguments.
    fn run(jobs: &JobTable, args: &[String], stdout: &mut dyn Write) -> Result<Flow>;
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Builtin {
    Exit,
    Help,
    Cd,
    Jobs,
}

/// Recognized builtins, in lookup priority order.
const BUILTINS: [(&str, Builtin); 4] = [
    (EXIT_NAME, Builtin::Exit),
    (HELP_NAME, Builtin::Help),
    (CD_NAME, Builtin::Cd),
    (JOBS_NAME, Builtin::Jobs),
];

impl Builtin {
    /// Returns `None` when `program` should be launched as an external command.
    pub fn from_name<T: AsRef<str>>(program: T) -> Option<Builtin> {
        BUILTINS
            .iter()
            .find(|&&(name, _)| name == program.as_ref())
            .map(|&(_, builtin)| builtin)
    }

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Exit => Exit::NAME,
            Builtin::Help => Help::NAME,
            Builtin::Cd => Cd::NAME,
            Builtin::Jobs => Jobs::NAME,
        }
    }

    pub fn usage(self) -> &'static str {
        match self {
            Builtin::Exit => Exit::usage(),
            Builtin::Help => Help::usage(),
            Builtin::Cd => Cd::usage(),
            Builtin::Jobs => Jobs::usage(),
        }
    }

    pub fn run(self, jobs: &JobTable, args: &[String], stdout: &mut dyn Write) -> Result<Flow> {
        match self {
            Builtin::Exit => Exit::run(jobs, args, stdout),
            Builtin::Help => Help::run(jobs, args, stdout),
            Builtin::Cd => Cd::run(jobs, args, stdout),
            Builtin::Jobs => Jobs::run(jobs, args, stdout),
        }
    }

    pub fn all() -> impl Iterator<Item = Builtin> {
        BUILTINS.iter().map(|&(_, builtin)| builtin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(Builtin::from_name("exit"), Some(Builtin::Exit));
        assert_eq!(Builtin::from_name("help"), Some(Builtin::Help));
        assert_eq!(Builtin::from_name("cd"), Some(Builtin::Cd));
        assert_eq!(Builtin::from_name("jobs"), Some(Builtin::Jobs));
        assert_eq!(Builtin::from_name("ls"), None);
        assert_eq!(Builtin::from_name("Exit"), None);
        assert_eq!(Builtin::from_name(""), None);
    }

    #[test]
    fn test_names_match_lookup_table() {
        for builtin in Builtin::all() {
            assert_eq!(Builtin::from_name(builtin.name()), Some(builtin));
            assert!(builtin.usage().starts_with(builtin.name()));
        }
    }
}

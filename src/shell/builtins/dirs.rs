use std::env;
use std::io::Write;
use std::path::PathBuf;

use log::debug;

use crate::{
    core::job_table::JobTable,
    errors::{Error, Result},
    shell::{
        builtins::{self, BuiltinCommand},
        Flow,
    },
};

pub struct Cd;

impl BuiltinCommand for Cd {
    const NAME: &'static str = builtins::CD_NAME;

    const HELP: &'static str = "\
cd [dir]
    Change the current directory to DIR. The variable $HOME is the default dir.";

    fn run(_jobs: &JobTable, args: &[String], _stdout: &mut dyn Write) -> Result<Flow> {
        let dir = match args {
            [] => home_dir().ok_or_else(|| Error::builtin_command("cd: HOME not set", 1))?,
            [dir] => PathBuf::from(dir),
            _ => return Err(Error::builtin_command("cd: too many arguments", 1)),
        };

        env::set_current_dir(&dir).map_err(|e| {
            Error::builtin_command(format!("cd: {}: {}", dir.display(), e), 1)
        })?;
        debug!("changed directory to {}", dir.display());
        Ok(Flow::Continue)
    }
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
        .or_else(::dirs::home_dir)
}

use std::io::Write;

use failure::ResultExt;

use crate::{
    core::job_table::JobTable,
    errors::{ErrorKind, Result},
    shell::{
        builtins::{self, Builtin, BuiltinCommand},
        Flow,
    },
};

pub struct Help;

impl BuiltinCommand for Help {
    const NAME: &'static str = builtins::HELP_NAME;

    const HELP: &'static str = "\
help
    Display the builtin commands.";

    fn run(_jobs: &JobTable, _args: &[String], stdout: &mut dyn Write) -> Result<Flow> {
        for builtin in Builtin::all() {
            writeln!(stdout, "{}", builtin.usage()).context(ErrorKind::Io)?;
        }

        Ok(Flow::Continue)
    }
}

use std::io::Write;

use crate::{
    core::job_table::JobTable,
    errors::Result,
    shell::{
        builtins::{self, BuiltinCommand},
        Flow,
    },
    util,
};

pub struct Exit;

impl BuiltinCommand for Exit {
    const NAME: &'static str = builtins::EXIT_NAME;

    const HELP: &'static str = "\
exit [n]
    Exit the shell with a status of N. If N is omitted, the exit status
    is 0. Background jobs are left running.";

    fn run(_jobs: &JobTable, args: &[String], _stdout: &mut dyn Write) -> Result<Flow> {
        let status_code = args
            .first()
            .map(|arg| {
                arg.parse::<i32>().unwrap_or_else(|_| {
                    eprintln!("jsh: exit: {}: numeric argument required", arg);
                    2
                })
            })
            .unwrap_or(0);
        Ok(Flow::Exit(util::exit_code_like_u8(status_code)))
    }
}

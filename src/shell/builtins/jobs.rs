use std::io::Write;

use failure::ResultExt;

use crate::{
    core::job_table::JobTable,
    errors::{ErrorKind, Result},
    shell::{
        builtins::{self, BuiltinCommand},
        Flow,
    },
};

pub struct Jobs;

impl BuiltinCommand for Jobs {
    const NAME: &'static str = builtins::JOBS_NAME;

    const HELP: &'static str = "\
jobs
    Display status of jobs, oldest first.";

    fn run(jobs: &JobTable, _args: &[String], stdout: &mut dyn Write) -> Result<Flow> {
        for job in jobs.iter().filter(|job| !job.is_terminated()) {
            writeln!(stdout, "{}", job).context(ErrorKind::Io)?;
        }

        Ok(Flow::Continue)
    }
}

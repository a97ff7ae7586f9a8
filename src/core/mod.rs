//! Shell-independent data: jobs, the job table and command lines.

pub mod job;
pub mod job_table;
pub mod parser;

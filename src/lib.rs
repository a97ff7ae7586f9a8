//! Jsh - Job-control shell
//!
//! Launches external programs in the foreground or background, tracks them
//! until they terminate and runs the few builtins that need the shell's own
//! state.

#![deny(
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces
)]

#[macro_use]
mod util;

pub mod core;
pub mod editor;
pub mod errors;
pub mod shell;

pub use crate::core::job::{Disposition, Job, JobStatus, Mode};
pub use crate::core::job_table::JobTable;
pub use crate::core::parser::CommandLine;
pub use crate::editor::{Editor, LineSource, ScriptReader};
pub use crate::shell::{Flow, Shell, ShellConfig};
pub use crate::util::isatty;

//! Jsh - Shell Module
//!
//! The Shell reads commands, runs builtins itself and launches everything
//! else as a foreground or background job.

use std::fmt;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use failure::ResultExt;
use log::{debug, error, info, warn};

use crate::{
    core::{
        job::{JobStatus, Mode},
        job_table::JobTable,
        parser::CommandLine,
    },
    editor::LineSource,
    errors::{Error, ErrorKind, Result},
};

use self::builtins::Builtin;

pub mod builtins;
pub mod execute_command;
pub mod job_control;

pub const HISTORY_FILE_NAME: &str = ".jsh_history";
pub const PROMPT: &str = "-> ";

/// What the shell loop does after a command.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Flow {
    Continue,
    Exit(i32),
}

/// Policy object to control a Shell's behavior
#[derive(Debug, Copy, Clone)]
pub struct ShellConfig {
    /// Determines if new command entries will be added to the shell's command history.
    ///
    /// Note: This is checked before the other command history config fields.
    enable_command_history: bool,

    /// Number of entries to store in the shell's command history
    command_history_capacity: usize,

    /// Determines if the shell ignores terminal job-control signals.
    enable_job_control: bool,

    /// Determines if some messages (e.g. "exit") should be displayed.
    display_messages: bool,
}

impl ShellConfig {
    /// Creates an interactive shell, e.g. command history, job control
    ///
    /// # Complete List
    /// - Command History is enabled
    /// - Job Control signals are ignored by the shell
    /// - Some additional messages are displayed
    pub fn interactive(command_history_capacity: usize) -> Self {
        Self {
            enable_command_history: true,
            command_history_capacity,
            enable_job_control: true,
            display_messages: true,
        }
    }

    /// Creates a noninteractive shell, e.g. no command history
    pub fn noninteractive() -> Self {
        Default::default()
    }

    pub fn command_history_capacity(&self) -> usize {
        self.command_history_capacity
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            enable_command_history: false,
            command_history_capacity: 0,
            enable_job_control: false,
            display_messages: false,
        }
    }
}

/// Jsh Shell
pub struct Shell {
    /// Responsible for reading lines and for history.
    input: Box<dyn LineSource>,
    history_file: Option<PathBuf>,
    jobs: JobTable,
    config: ShellConfig,
}

impl Shell {
    /// Constructs a new Shell reading its commands from `input`.
    pub fn new(config: ShellConfig, input: Box<dyn LineSource>) -> Result<Shell> {
        let mut shell = Shell {
            input,
            history_file: None,
            jobs: JobTable::new(),
            config,
        };

        if config.enable_job_control {
            let temp_result = job_control::initialize_job_control();
            log_if_err!(temp_result, "failed to initialize job control");
        }

        if config.enable_command_history {
            let temp_result = shell.load_history();
            log_if_err!(temp_result, "failed to load history");
        }

        info!("jsh started up");
        Ok(shell)
    }

    fn load_history(&mut self) -> Result<()> {
        self.history_file = ::dirs::home_dir().map(|p| p.join(HISTORY_FILE_NAME));
        match self.history_file {
            Some(ref history_file) => self.input.load_history(history_file),
            None => {
                warn!("unable to get home directory");
                Ok(())
            }
        }
    }

    pub fn jobs(&self) -> &JobTable {
        &self.jobs
    }

    /// Runs the read-eval loop until end of input or `exit`.
    ///
    /// Returns the status the shell should exit with. An `Err` is a fatal
    /// error; the shell must not keep running.
    pub fn execute_from_input(&mut self) -> Result<i32> {
        let stdout = io::stdout();
        let mut stdout = stdout.lock();
        self.execute_lines(&mut stdout)
    }

    fn execute_lines(&mut self, stdout: &mut dyn Write) -> Result<i32> {
        let code = loop {
            let input = match self.input.readline(PROMPT) {
                Ok(Some(line)) => line,
                Ok(None) => break 0,
                Err(ref e) if *e.kind() == ErrorKind::InvalidUtf8 => {
                    eprintln!("jsh: {}", e);
                    continue;
                }
                Err(e) => {
                    error!("unable to read input, shutting down: {}", e);
                    return Err(e);
                }
            };

            if let Flow::Exit(code) = self.execute_command_string(&input, stdout)? {
                break code;
            }
        };

        if self.config.display_messages {
            writeln!(stdout, "exit").context(ErrorKind::Io)?;
        }
        Ok(code)
    }

    /// Runs one line of input. Recoverable errors are reported to the user
    /// and swallowed; only fatal errors are returned.
    pub fn execute_command_string(
        &mut self,
        input: &str,
        stdout: &mut dyn Write,
    ) -> Result<Flow> {
        if self.config.enable_command_history && !input.trim().is_empty() {
            self.input.add_history_entry(input);
            if let Some(ref history_file) = self.history_file {
                let temp_result = self.input.append_history(history_file);
                log_if_err!(temp_result, "failed to append to history file");
            }
        }

        let command = match CommandLine::parse(input) {
            Ok(Some(command)) => command,
            Ok(None) => return Ok(Flow::Continue),
            Err(e) => {
                eprintln!("jsh: {}", e);
                return Ok(Flow::Continue);
            }
        };

        let flow = match Builtin::from_name(command.program()) {
            Some(builtin) => {
                debug!("running builtin {}", builtin.name());
                builtin
                    .run(&self.jobs, command.args(), stdout)
                    .or_else(|e| self.recover(e))?
            }
            None => {
                self.execute_job(command, stdout)
                    .or_else(|e| self.recover(e))?;
                Flow::Continue
            }
        };

        if flow == Flow::Continue {
            let temp_result = job_control::do_job_notification(&mut self.jobs, stdout);
            log_if_err!(temp_result, "do_job_notification");
        }

        Ok(flow)
    }

    /// Reports a recoverable error, passes a fatal one through.
    fn recover<T: Default>(&self, e: Error) -> Result<T> {
        if e.is_fatal() {
            return Err(e);
        }

        debug!("recovered from: {}", e);
        eprintln!("jsh: {}", e);
        Ok(T::default())
    }

    /// Launches `command` and either waits for it or leaves it running in
    /// the background.
    fn execute_job(&mut self, command: CommandLine, stdout: &mut dyn Write) -> Result<()> {
        let mode = if command.background {
            Mode::Background
        } else {
            Mode::Foreground
        };

        let pid = execute_command::launch(&command.argv, mode)?;
        // Tracked before any wait, so a child that has already exited is
        // still accounted for.
        let job = self.jobs.save(pid, command.argv, JobStatus::Running, mode)?;

        if mode == Mode::Background {
            writeln!(stdout, "{}", job).context(ErrorKind::Io)?;
            return Ok(());
        }

        let status = job_control::wait_for_foreground(pid)?;
        self.jobs.set_status(pid, status)?;
        if status.is_terminated() {
            let job = self.jobs.delete(pid)?;
            debug!("foreground job finished: {}", job);
        } else if let Some(job) = self.jobs.get(pid) {
            writeln!(stdout, "{}", job).context(ErrorKind::Io)?;
        }

        Ok(())
    }

    /// Releases every tracked job and saves the history. Background jobs
    /// are neither waited on nor signaled.
    pub fn shutdown(&mut self) {
        if !self.jobs.is_empty() {
            info!("leaving {} jobs behind", self.jobs.len());
        }
        self.jobs.clear();

        if self.config.enable_command_history {
            if let Some(ref history_file) = self.history_file {
                let temp_result = self.input.save_history(history_file);
                log_if_err!(temp_result, "failed to save history to file during shutdown");
            }
        }

        info!("jsh has shut down");
    }

    /// Shuts down and terminates the process with status `code`.
    pub fn exit(&mut self, code: i32) -> ! {
        self.shutdown();
        let temp_result = io::stdout().flush();
        log_if_err!(temp_result, "failed to flush stdout");
        process::exit(code);
    }
}

impl Default for Flow {
    fn default() -> Self {
        Flow::Continue
    }
}

impl fmt::Debug for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}\n{:?}", self.config, self.jobs)
    }
}

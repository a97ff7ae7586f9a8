use std::fs::File;
use std::io::{self, BufReader, Cursor};
use std::path::PathBuf;
use std::process;

use docopt::Docopt;
use failure::ResultExt;
use jsh::errors::{Error, ErrorKind, Result};
use jsh::{Editor, LineSource, ScriptReader, Shell, ShellConfig};
use log::{debug, error};
use nix::unistd::Pid;
use serde::Deserialize;

const COMMAND_HISTORY_CAPACITY: usize = 100;
const LOG_FILE_NAME: &str = ".jsh_log";
const EXIT_FAILURE: i32 = 1;

const USAGE: &str = "
jsh.

Usage:
    jsh [options]
    jsh [options] -c <command>
    jsh [options] <file>
    jsh (-h | --help)
    jsh --version

Options:
    -h --help       Show this screen.
    --version       Show version.
    -c              If the -c option is present, then commands are read from the first non-option
                        argument command_string.
    --log=<path>    File to write log to, defaults to ~/.jsh_log
";

/// Docopts input arguments.
#[derive(Debug, Deserialize)]
struct Args {
    arg_command: Option<String>,
    arg_file: Option<String>,
    flag_version: bool,
    flag_c: bool,
    flag_log: Option<String>,
}

fn main() {
    let args: Args = Docopt::new(USAGE)
        .and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());

    init_logger(&args.flag_log);
    debug!("{:?}", args);

    if args.flag_version {
        println!("jsh version {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let (config, input) = create_input(&args).unwrap_or_else(|e| display_error_and_exit(&e));
    let mut shell = Shell::new(config, input).unwrap_or_else(|e| display_error_and_exit(&e));
    let code = match shell.execute_from_input() {
        Ok(code) => code,
        Err(e) => {
            error!("fatal error: {}", e);
            eprintln!("jsh: {}", e);
            EXIT_FAILURE
        }
    };
    shell.exit(code)
}

fn init_logger(path: &Option<String>) {
    let log_path = match path
        .clone()
        .map(PathBuf::from)
        .or_else(default_log_path)
    {
        Some(log_path) => log_path,
        None => return,
    };

    let log_file = match fern::log_file(&log_path) {
        Ok(log_file) => log_file,
        Err(e) => {
            eprintln!("jsh: unable to open log file {}: {}", log_path.display(), e);
            return;
        }
    };

    let pid = Pid::this();
    let temp_result = fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{} [{}] {}: {}",
                pid,
                record.level(),
                record.target(),
                message
            ))
        })
        .level(log::LevelFilter::Debug)
        .chain(log_file)
        .apply();
    if let Err(e) = temp_result {
        eprintln!("jsh: unable to initialize logging: {}", e);
    }
}

fn default_log_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(LOG_FILE_NAME))
}

/// Commands come from `-c`, a script file, or standard input. Only a
/// terminal on standard input makes the shell interactive.
fn create_input(args: &Args) -> Result<(ShellConfig, Box<dyn LineSource>)> {
    if let Some(ref command) = args.arg_command {
        let reader = Cursor::new(command.clone().into_bytes());
        return Ok((ShellConfig::noninteractive(), Box::new(ScriptReader::new(reader))));
    }

    if let Some(ref file_path) = args.arg_file {
        let file = File::open(file_path).context(ErrorKind::Io)?;
        let reader = BufReader::new(file);
        return Ok((ShellConfig::noninteractive(), Box::new(ScriptReader::new(reader))));
    }

    if jsh::isatty() {
        let config = ShellConfig::interactive(COMMAND_HISTORY_CAPACITY);
        let editor = Editor::with_capacity(config.command_history_capacity())?;
        return Ok((config, Box::new(editor)));
    }

    let reader = io::stdin().lock();
    Ok((ShellConfig::noninteractive(), Box::new(ScriptReader::new(reader))))
}

fn display_error_and_exit(error: &Error) -> ! {
    error!("failed to create shell: {}", error);
    eprintln!("jsh: {}", error);
    process::exit(EXIT_FAILURE);
}

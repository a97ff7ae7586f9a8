//! Sources of input lines for the shell loop.

use std::fmt;
use std::io::{self, BufRead};
use std::path::Path;

use failure::{Fail, ResultExt};
use log::debug;
use rustyline::{
    self,
    completion::{Completer, FilenameCompleter, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::{DefaultHistory, History},
    validate::Validator,
    CompletionType, Config, Helper,
};

use crate::errors::{ErrorKind, Result};

/// Produces one logical line per call.
pub trait LineSource {
    /// Returns `None` when end of file is reached.
    fn readline(&mut self, prompt: &str) -> Result<Option<String>>;

    fn add_history_entry(&mut self, _line: &str) {}

    fn load_history(&mut self, _path: &Path) -> Result<()> {
        Ok(())
    }

    /// Appends the entries added since the last save or append.
    fn append_history(&mut self, _path: &Path) -> Result<()> {
        Ok(())
    }

    fn save_history(&mut self, _path: &Path) -> Result<()> {
        Ok(())
    }
}

struct EditorHelper(FilenameCompleter);

impl Completer for EditorHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        self.0.complete(line, pos, ctx)
    }
}

impl Hinter for EditorHelper {
    type Hint = String;
}

impl Highlighter for EditorHelper {}

impl Validator for EditorHelper {}

impl Helper for EditorHelper {}

/// Interactive line editor with persistent history.
pub struct Editor {
    internal: rustyline::Editor<EditorHelper, DefaultHistory>,
    /// The total number of history items saved this session
    history_count: usize,
}

impl Editor {
    pub fn with_capacity(history_capacity: usize) -> Result<Editor> {
        let config = Config::builder()
            .max_history_size(history_capacity)
            .context(ErrorKind::Readline)?
            .history_ignore_space(true)
            .completion_type(CompletionType::Circular)
            .auto_add_history(false)
            .build();

        let mut internal = rustyline::Editor::with_config(config).context(ErrorKind::Readline)?;
        internal.set_helper(Some(EditorHelper(FilenameCompleter::new())));

        Ok(Editor {
            internal,
            history_count: 0,
        })
    }

    pub fn history_len(&self) -> usize {
        self.internal.history().len()
    }

    pub fn history_count(&self) -> usize {
        self.history_count
    }
}

impl LineSource for Editor {
    fn readline(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.internal.readline(prompt) {
            Ok(line) => Ok(Some(line)),
            Err(ReadlineError::Eof) => Ok(None),
            // ^C at the prompt abandons the line, not the shell
            Err(ReadlineError::Interrupted) => Ok(Some(String::new())),
            Err(ReadlineError::Io(ref e)) if e.kind() == io::ErrorKind::InvalidData => Err(ErrorKind::InvalidUtf8.into()),
            Err(e) => Err(e.context(ErrorKind::Readline).into()),
        }
    }

    fn add_history_entry(&mut self, line: &str) {
        match self.internal.add_history_entry(line) {
            Ok(true) => self.history_count += 1,
            Ok(false) => {}
            Err(e) => debug!("history entry not added: {}", e),
        }
    }

    fn load_history(&mut self, path: &Path) -> Result<()> {
        match self.internal.load_history(path) {
            Ok(()) => Ok(()),
            Err(ReadlineError::Io(ref inner)) if inner.kind() == io::ErrorKind::NotFound => {
                debug!("no history file at {}", path.display());
                Ok(())
            }
            Err(e) => Err(e.context(ErrorKind::Readline).into()),
        }
    }

    fn append_history(&mut self, path: &Path) -> Result<()> {
        self.internal
            .append_history(path)
            .context(ErrorKind::Readline)?;
        Ok(())
    }

    fn save_history(&mut self, path: &Path) -> Result<()> {
        self.internal
            .save_history(path)
            .context(ErrorKind::Readline)?;
        Ok(())
    }
}

impl fmt::Debug for Editor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "count: {}", self.history_count)?;
        writeln!(f, "len: {}", self.history_len())
    }
}

/// Reads lines from a script, a `-c` command string or piped standard input.
/// No prompt is displayed and nothing is recorded in history.
pub struct ScriptReader<R> {
    reader: R,
}

impl<R: BufRead> ScriptReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineSource for ScriptReader<R> {
    /// A line that is not valid UTF-8 is consumed and reported as
    /// `InvalidUtf8`, so the next call resumes with the following line.
    fn readline(&mut self, _prompt: &str) -> Result<Option<String>> {
        let mut buf = Vec::new();
        let n = self
            .reader
            .read_until(b'\n', &mut buf)
            .context(ErrorKind::Io)?;
        if n == 0 {
            return Ok(None);
        }

        while buf.ends_with(b"\n") || buf.ends_with(b"\r") {
            buf.pop();
        }
        match String::from_utf8(buf) {
            Ok(line) => Ok(Some(line)),
            Err(e) => {
                debug!("skipping input line: {}", e);
                Err(ErrorKind::InvalidUtf8.into())
            }
        }
    }
}

impl<R> fmt::Debug for ScriptReader<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScriptReader")
    }
}

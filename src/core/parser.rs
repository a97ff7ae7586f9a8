//! Turns a raw input line into an argument vector.

use crate::errors::{Error, Result};

const BACKGROUND_OPERATOR: char = '&';

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommandLine {
    /// Command line, used for messages
    pub input: String,
    /// Program followed by its arguments
    pub argv: Vec<String>,
    /// Run the command in the background, defaults to false
    pub background: bool,
}

impl CommandLine {
    /// Splits `input` on whitespace. A trailing `&`, either on its own or
    /// attached to the last word, requests background execution.
    ///
    /// Returns `None` for blank lines.
    pub fn parse(input: &str) -> Result<Option<CommandLine>> {
        let mut argv: Vec<String> = input.split_whitespace().map(String::from).collect();
        if argv.is_empty() {
            return Ok(None);
        }

        let mut background = false;
        if let Some(last) = argv.last_mut() {
            if last.ends_with(BACKGROUND_OPERATOR) {
                last.pop();
                background = true;
            }
        }
        if argv.last().map_or(false, String::is_empty) {
            argv.pop();
        }

        if argv.is_empty() || argv.iter().any(|arg| arg == "&") {
            return Err(Error::syntax(input.trim()));
        }

        Ok(Some(CommandLine {
            input: input.trim().to_string(),
            argv,
            background,
        }))
    }

    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    pub fn args(&self) -> &[String] {
        &self.argv[1..]
    }
}

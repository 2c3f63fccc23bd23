//! Script commands
//!
//! The CLI reads one command per line, from stdin or a script file:
//!
//! ```text
//! next | prev            page one shelf
//! hover <position>       pointer enters a book
//! unhover <position>     pointer leaves a book
//! click <position>       select or deselect a book
//! wheel <delta>          feed a scroll delta
//! visit                  start the visit cinematic
//! wait <ms>              let frames run before the next command
//! status                 print the current state
//! quit                   stop
//! ```
//!
//! Books are addressed by their catalog position. Blank lines and lines
//! starting with `#` are skipped.

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// A single parsed line
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Page to the previous shelf
    Previous,
    /// Page to the next shelf
    Next,
    /// Pointer enters the book at this catalog position
    Hover(usize),
    /// Pointer leaves the book at this catalog position
    Unhover(usize),
    /// Click the book at this catalog position
    Click(usize),
    /// Scroll delta
    Wheel(f32),
    /// Visit the active book
    Visit,
    /// Hold the script for a while
    Wait(Duration),
    /// Print state
    Status,
    /// Stop the CLI
    Quit,
}

/// Script parse errors
#[derive(Debug, Error, PartialEq)]
pub enum ScriptError {
    /// First word is not a command
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    /// Required argument absent
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),

    /// Argument did not parse
    #[error("invalid argument '{value}' for '{command}'")]
    InvalidArgument {
        /// Command being parsed
        command: &'static str,
        /// Offending text
        value: String,
    },

    /// Extra words after a complete command
    #[error("unexpected '{0}'")]
    TrailingInput(String),
}

impl Command {
    /// Parse one script line. `Ok(None)` for blank lines and comments.
    pub fn parse_line(line: &str) -> Result<Option<Self>, ScriptError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        line.parse().map(Some)
    }
}

impl FromStr for Command {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let head = words.next().unwrap_or_default().to_ascii_lowercase();

        let command = match head.as_str() {
            "prev" | "previous" => Self::Previous,
            "next" => Self::Next,
            "hover" => Self::Hover(argument(&mut words, "hover")?),
            "unhover" => Self::Unhover(argument(&mut words, "unhover")?),
            "click" => Self::Click(argument(&mut words, "click")?),
            "wheel" => {
                let delta: f32 = argument(&mut words, "wheel")?;
                if !delta.is_finite() {
                    return Err(ScriptError::InvalidArgument {
                        command: "wheel",
                        value: delta.to_string(),
                    });
                }
                Self::Wheel(delta)
            }
            "visit" => Self::Visit,
            "wait" => Self::Wait(Duration::from_millis(argument(&mut words, "wait")?)),
            "status" => Self::Status,
            "quit" | "exit" => Self::Quit,
            _ => return Err(ScriptError::UnknownCommand(head)),
        };

        match words.next() {
            Some(extra) => Err(ScriptError::TrailingInput(extra.to_string())),
            None => Ok(command),
        }
    }
}

fn argument<'a, T: FromStr>(
    words: &mut impl Iterator<Item = &'a str>,
    command: &'static str,
) -> Result<T, ScriptError> {
    let word = words.next().ok_or(ScriptError::MissingArgument(command))?;
    word.parse().map_err(|_| ScriptError::InvalidArgument {
        command,
        value: word.to_string(),
    })
}

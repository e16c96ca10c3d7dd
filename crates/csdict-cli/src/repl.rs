//! Interactive command loop.
//!
//! Reads one command per line, validates it against the connection state and
//! its argument count, and hands it to the [`Session`]. Validation failures are
//! printed with the client's `90x` codes and never reach the session.

use std::io::{BufRead, Write};

use thiserror::Error;

use crate::session::{Session, Transcript};
use crate::transport::Connector;
use crate::{AppError, IoStreams};

/// Prompt written before each command is read.
pub(crate) const PROMPT: &str = "csdict> ";

/// Whether the loop keeps reading commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Exit,
}

/// A validated user command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    Open { host: String, port: Option<u16> },
    ListDictionaries,
    SetDictionary(String),
    CurrentDictionary,
    Define(String),
    Match(String),
    PrefixMatch(String),
    Close,
    Quit,
}

/// Reasons a line is rejected before reaching the session.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub(crate) enum CommandError {
    #[error("900 Invalid command")]
    InvalidCommand,
    #[error("901 Incorrect number of arguments")]
    ArgumentCount,
    #[error("902 Invalid argument")]
    InvalidArgument,
    #[error("903 Supplied command not expected at this time")]
    NotExpected,
}

impl Command {
    /// Parses one input line.
    ///
    /// Returns `Ok(None)` for blank lines and `#` comments. The connection
    /// state is checked before the argument count, except for `close` and
    /// `quit` which are valid in either state.
    pub(crate) fn parse(line: &str, connected: bool) -> Result<Option<Self>, CommandError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((verb, arguments)) = tokens.split_first() else {
            return Ok(None);
        };
        if verb.starts_with('#') {
            return Ok(None);
        }

        let command = match verb.to_lowercase().as_str() {
            "open" => {
                if connected {
                    return Err(CommandError::NotExpected);
                }
                parse_open(arguments)?
            }
            "dict" => {
                require_connection(connected)?;
                no_arguments(arguments)?;
                Self::ListDictionaries
            }
            "set" => {
                require_connection(connected)?;
                Self::SetDictionary(single_argument(arguments)?)
            }
            "currdict" => {
                require_connection(connected)?;
                no_arguments(arguments)?;
                Self::CurrentDictionary
            }
            "define" => {
                require_connection(connected)?;
                Self::Define(single_argument(arguments)?)
            }
            "match" => {
                require_connection(connected)?;
                Self::Match(single_argument(arguments)?)
            }
            "prefixmatch" => {
                require_connection(connected)?;
                Self::PrefixMatch(single_argument(arguments)?)
            }
            "close" => {
                no_arguments(arguments)?;
                Self::Close
            }
            "quit" => {
                no_arguments(arguments)?;
                Self::Quit
            }
            _ => return Err(CommandError::InvalidCommand),
        };
        Ok(Some(command))
    }
}

fn parse_open(arguments: &[&str]) -> Result<Command, CommandError> {
    match arguments {
        [host] => Ok(Command::Open {
            host: (*host).to_owned(),
            port: None,
        }),
        [host, port] => {
            let port = port
                .parse::<u16>()
                .map_err(|_| CommandError::InvalidArgument)?;
            Ok(Command::Open {
                host: (*host).to_owned(),
                port: Some(port),
            })
        }
        _ => Err(CommandError::ArgumentCount),
    }
}

const fn require_connection(connected: bool) -> Result<(), CommandError> {
    if connected {
        Ok(())
    } else {
        Err(CommandError::NotExpected)
    }
}

const fn no_arguments(arguments: &[&str]) -> Result<(), CommandError> {
    if arguments.is_empty() {
        Ok(())
    } else {
        Err(CommandError::ArgumentCount)
    }
}

fn single_argument(arguments: &[&str]) -> Result<String, CommandError> {
    match arguments {
        [argument] => Ok((*argument).to_owned()),
        _ => Err(CommandError::ArgumentCount),
    }
}

/// Drives a [`Session`] from terminal input.
pub(crate) struct Repl<C>
where
    C: Connector,
{
    session: Session<C>,
    default_port: u16,
}

impl<C> Repl<C>
where
    C: Connector,
{
    pub(crate) fn new(session: Session<C>, default_port: u16) -> Self {
        Self {
            session,
            default_port,
        }
    }

    #[cfg(test)]
    pub(crate) fn session(&self) -> &Session<C> {
        &self.session
    }

    /// Reads and executes commands until `quit` or end of input.
    ///
    /// End of input behaves like `quit`. A failure to read input ends the loop
    /// with [`AppError::ReadCommand`]; the session, and with it any open
    /// connection, is dropped by the caller.
    pub(crate) fn run<R, W, E>(&mut self, io: &mut IoStreams<'_, R, W, E>) -> Result<(), AppError>
    where
        R: BufRead,
        W: Write,
        E: Write,
    {
        loop {
            io.stdout
                .write_all(PROMPT.as_bytes())
                .and_then(|()| io.stdout.flush())
                .map_err(AppError::WriteOutput)?;

            let mut line = String::new();
            let read = io
                .stdin
                .read_line(&mut line)
                .map_err(AppError::ReadCommand)?;
            if read == 0 {
                tracing::debug!("end of input");
                let transcript = self.session.quit();
                return self.emit(&transcript, io.stdout);
            }

            if self.execute(&line, io.stdout)? == Flow::Exit {
                return Ok(());
            }
        }
    }

    /// Executes one input line, writing its output to `stdout`.
    pub(crate) fn execute<W>(&mut self, line: &str, stdout: &mut W) -> Result<Flow, AppError>
    where
        W: Write,
    {
        let command = match Command::parse(line, self.session.is_connected()) {
            Ok(Some(command)) => command,
            Ok(None) => return Ok(Flow::Continue),
            Err(error) => {
                writeln!(stdout, "{error}").map_err(AppError::WriteOutput)?;
                return Ok(Flow::Continue);
            }
        };

        tracing::debug!(?command, "dispatching command");
        let transcript = match command {
            Command::Open { host, port } => self
                .session
                .open(&host, port.unwrap_or(self.default_port)),
            Command::ListDictionaries => self.session.list_dictionaries(),
            Command::SetDictionary(name) => {
                self.session.set_dictionary(&name);
                Transcript::default()
            }
            Command::CurrentDictionary => {
                writeln!(stdout, "{}", self.session.current_dictionary())
                    .map_err(AppError::WriteOutput)?;
                return Ok(Flow::Continue);
            }
            Command::Define(word) => self.session.define(&word),
            Command::Match(word) => self.session.match_word(&word),
            Command::PrefixMatch(prefix) => self.session.prefix_match(&prefix),
            Command::Close => self.session.close(),
            Command::Quit => {
                let transcript = self.session.quit();
                self.emit(&transcript, stdout)?;
                return Ok(Flow::Exit);
            }
        };
        self.emit(&transcript, stdout)?;
        Ok(Flow::Continue)
    }

    fn emit<W>(&self, transcript: &Transcript, stdout: &mut W) -> Result<(), AppError>
    where
        W: Write,
    {
        for line in transcript.render(self.session.mode()) {
            writeln!(stdout, "{line}").map_err(AppError::WriteOutput)?;
        }
        stdout.flush().map_err(AppError::WriteOutput)
    }
}

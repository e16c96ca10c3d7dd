//! Outbound request lines.

use std::fmt;
use std::io::{self, Write};

/// Dictionary name that addresses every database on the server.
pub const ALL_DICTIONARIES: &str = "*";

/// Matching strategy sent with `MATCH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Whole-word match.
    Exact,
    /// Words starting with the argument.
    Prefix,
    /// The server's default strategy.
    ServerDefault,
}

impl Strategy {
    const fn token(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Prefix => "prefix",
            Self::ServerDefault => ".",
        }
    }
}

/// A single protocol request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// `SHOW DB`
    ShowDatabases,
    /// `DEFINE <database> <word>`
    Define { database: String, word: String },
    /// `MATCH <database> <strategy> <word>`
    Match {
        database: String,
        strategy: Strategy,
        word: String,
    },
    /// `QUIT`
    Quit,
}

impl Request {
    pub(crate) fn define(database: &str, word: &str) -> Self {
        Self::Define {
            database: database.to_owned(),
            word: word.to_owned(),
        }
    }

    pub(crate) fn find(database: &str, strategy: Strategy, word: &str) -> Self {
        Self::Match {
            database: database.to_owned(),
            strategy,
            word: word.to_owned(),
        }
    }

    /// Writes the request followed by CRLF and flushes the writer.
    pub(crate) fn write_line<W>(&self, writer: &mut W) -> io::Result<()>
    where
        W: Write,
    {
        write!(writer, "{self}\r\n")?;
        writer.flush()
    }
}

impl fmt::Display for Request {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShowDatabases => formatter.write_str("SHOW DB"),
            Self::Define { database, word } => write!(formatter, "DEFINE {database} {word}"),
            Self::Match {
                database,
                strategy,
                word,
            } => write!(formatter, "MATCH {database} {} {word}", strategy.token()),
            Self::Quit => formatter.write_str("QUIT"),
        }
    }
}

//! Classification of server reply lines.
//!
//! DICT replies mix status lines (a three digit code followed by text) with
//! free-form data lines and `.` terminators. Only the codes that change how a
//! reply is consumed are modelled; every other line, including codes such as
//! `110` or `151`, is treated as data and shown verbatim.

use std::fmt;

/// Line that closes a multi-line data block.
pub(crate) const TERMINATOR: &str = ".";

/// Status codes with fixed meaning for the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// `250`: the request completed.
    Completed,
    /// `550`: the requested dictionary does not exist.
    NoDatabase,
    /// `552`: no matching word or definition.
    NoMatch,
}

impl StatusCode {
    /// Maps a numeric code to a known status.
    #[must_use]
    pub const fn from_code(code: u16) -> Option<Self> {
        match code {
            250 => Some(Self::Completed),
            550 => Some(Self::NoDatabase),
            552 => Some(Self::NoMatch),
            _ => None,
        }
    }

    /// Numeric value of the status.
    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Self::Completed => 250,
            Self::NoDatabase => 550,
            Self::NoMatch => 552,
        }
    }
}

/// Semantic classification of a single reply line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// A `.` line ending a listing or definition block.
    Terminator,
    /// A status the client reacts to. All of them end the exchange.
    Status(StatusCode),
    /// Anything else.
    Data,
}

/// A line received from the server with its line ending removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerLine {
    text: String,
    code: Option<u16>,
}

impl ServerLine {
    /// Parses raw line text, stripping any trailing `\r\n` or `\n`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let text = raw.trim_end_matches(['\r', '\n']).to_owned();
        let code = parse_code(&text);
        Self { text, code }
    }

    /// Line text as received.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Leading status code, when the line carries one.
    #[must_use]
    pub const fn code(&self) -> Option<u16> {
        self.code
    }

    /// Classifies the line.
    #[must_use]
    pub fn kind(&self) -> LineKind {
        if self.text == TERMINATOR {
            return LineKind::Terminator;
        }
        match self.code.and_then(StatusCode::from_code) {
            Some(status) => LineKind::Status(status),
            None => LineKind::Data,
        }
    }

    /// Known status carried by the line, if any.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self.kind() {
            LineKind::Status(status) => Some(status),
            LineKind::Terminator | LineKind::Data => None,
        }
    }

    /// Returns true for `.` lines.
    #[must_use]
    pub fn is_terminator(&self) -> bool {
        self.kind() == LineKind::Terminator
    }

    /// Returns true when the line announces a `.`-terminated text block
    /// (`11x` listings, `151` definitions, `152` match lists).
    #[must_use]
    pub fn opens_block(&self) -> bool {
        matches!(self.code, Some(110..=119 | 151 | 152))
    }

    /// Returns true for `4xx`/`5xx` replies, which always end an exchange.
    #[must_use]
    pub fn is_error_reply(&self) -> bool {
        matches!(self.code, Some(400..=599))
    }
}

impl fmt::Display for ServerLine {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.text)
    }
}

/// A status code is three ASCII digits followed by a space or end of line.
fn parse_code(text: &str) -> Option<u16> {
    let bytes = text.as_bytes();
    let (digits, rest) = bytes.split_at_checked(3)?;
    if !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    if !matches!(rest.first(), None | Some(b' ')) {
        return None;
    }
    digits
        .iter()
        .try_fold(0u16, |code, digit| {
            code.checked_mul(10)?.checked_add(u16::from(digit - b'0'))
        })
}

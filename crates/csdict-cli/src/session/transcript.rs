//! Operation transcripts and their rendering.
//!
//! Session operations record what happened on the wire as [`Event`]s. A
//! [`DisplayMode`] then decides which events become display lines: debug mode
//! mirrors the raw exchange with direction markers, quiet mode keeps only data
//! lines and client messages.

use std::fmt;

use super::SessionError;
use crate::protocol::{Request, ServerLine};

/// Marker prefixed to requests in debug mode.
pub const OUTBOUND_MARKER: &str = "--> ";
/// Marker prefixed to server lines in debug mode.
pub const INBOUND_MARKER: &str = "<-- ";

/// How transcripts are shown. Fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisplayMode {
    /// Show only reply content and client messages.
    #[default]
    Quiet,
    /// Mirror every request and reply line.
    Debug,
}

impl DisplayMode {
    /// Selects debug mode when `debug` is set.
    #[must_use]
    pub const fn from_debug_flag(debug: bool) -> Self {
        if debug { Self::Debug } else { Self::Quiet }
    }

    /// Returns true in debug mode.
    #[must_use]
    pub const fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }

    /// Renders one event, or `None` when the mode hides it.
    #[must_use]
    pub fn render(self, event: &Event) -> Option<String> {
        match (self, event) {
            (Self::Debug, Event::Sent(request)) => Some(format!("{OUTBOUND_MARKER}{request}")),
            (
                Self::Debug,
                Event::Received(line) | Event::Control(line) | Event::Framing(line),
            ) => Some(format!("{INBOUND_MARKER}{line}")),
            (Self::Quiet, Event::Received(line)) => Some(line.to_string()),
            (Self::Quiet, Event::Sent(_) | Event::Control(_) | Event::Framing(_)) => None,
            (_, Event::Notice(notice)) => Some(notice.to_string()),
            (_, Event::Failure(error)) => Some(error.to_string()),
        }
    }
}

/// Messages the client prints on its own behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// The selected dictionary has no definition for the word.
    NoDefinition,
    /// The all-dictionaries fallback found nothing either.
    NoDefinitionAnywhere,
    /// An exact match found nothing.
    NoMatches,
    /// A prefix match found nothing.
    NoPrefixMatches,
    /// The server rejected the selected dictionary.
    NoDictionary,
}

impl fmt::Display for Notice {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::NoDefinition => "**No definition found**",
            Self::NoDefinitionAnywhere => "***No dictionaries have a definition for this word***",
            Self::NoMatches => "****No matching word(s) found****",
            Self::NoPrefixMatches => "*****No prefix matches found*****",
            Self::NoDictionary => "930 Dictionary does not exist",
        })
    }
}

/// Something that happened during an operation.
#[derive(Debug)]
pub enum Event {
    /// A request written to the server.
    Sent(Request),
    /// Reply content: data, block headers, and unrecognised error replies.
    /// Status-shaped lines inside a text block land here too.
    Received(ServerLine),
    /// A `.` terminator or a status the client acts on.
    Control(ServerLine),
    /// A server line outside any reply body: the greeting, the `QUIT`
    /// acknowledgement, or the status trailing a listing.
    Framing(ServerLine),
    /// A client message.
    Notice(Notice),
    /// The error that ended the operation.
    Failure(SessionError),
}

/// Ordered record of one operation.
#[derive(Debug, Default)]
pub struct Transcript {
    events: Vec<Event>,
}

impl Transcript {
    pub(crate) fn push(&mut self, event: Event) {
        self.events.push(event);
    }

    pub(crate) fn notice(&mut self, notice: Notice) {
        self.push(Event::Notice(notice));
    }

    /// Events in the order they happened.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Requests written during the operation.
    pub fn requests(&self) -> impl Iterator<Item = &Request> {
        self.events.iter().filter_map(|event| match event {
            Event::Sent(request) => Some(request),
            _ => None,
        })
    }

    /// The failure that ended the operation, if any.
    #[must_use]
    pub fn failure(&self) -> Option<&SessionError> {
        self.events.iter().find_map(|event| match event {
            Event::Failure(error) => Some(error),
            _ => None,
        })
    }

    /// Display lines for `mode`.
    #[must_use]
    pub fn render(&self, mode: DisplayMode) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|event| mode.render(event))
            .collect()
    }
}

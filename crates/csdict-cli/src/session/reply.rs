//! Reply framing for `DEFINE`, `MATCH`, and `SHOW DB`.
//!
//! A reply is a run of lines ending in a terminal status. Text blocks opened by
//! `11x`, `151` or `152` lines run until a `.` line, and their contents are
//! never read as status lines.

use std::io::{Read, Write};

use super::{Event, SessionError, Transcript};
use crate::protocol::{ServerLine, StatusCode};
use crate::transport::Connection;

/// How a reply ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// `250`
    Completed,
    /// `550`
    NoDatabase,
    /// `552`
    NoMatch,
    /// Any other `4xx`/`5xx` reply. Shown to the user as data.
    Rejected,
}

impl From<StatusCode> for Outcome {
    fn from(status: StatusCode) -> Self {
        match status {
            StatusCode::Completed => Self::Completed,
            StatusCode::NoDatabase => Self::NoDatabase,
            StatusCode::NoMatch => Self::NoMatch,
        }
    }
}

/// Effect of one line on the reply being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    Continue,
    BlockClosed,
    End(Outcome),
}

impl Step {
    /// Returns true when the line that produced this step is reply content
    /// rather than a terminator or a status the client acts on.
    pub(crate) const fn is_content(self) -> bool {
        matches!(self, Self::Continue | Self::End(Outcome::Rejected))
    }
}

/// Tracks whether the reader is inside a text block.
#[derive(Debug, Default)]
pub(crate) struct ReplyFraming {
    in_block: bool,
}

impl ReplyFraming {
    pub(crate) fn step(&mut self, line: &ServerLine) -> Step {
        if line.is_terminator() {
            self.in_block = false;
            return Step::BlockClosed;
        }
        if self.in_block {
            return Step::Continue;
        }
        if let Some(status) = line.status() {
            return Step::End(status.into());
        }
        if line.is_error_reply() {
            return Step::End(Outcome::Rejected);
        }
        if line.opens_block() {
            self.in_block = true;
        }
        Step::Continue
    }
}

/// Records `line` in `transcript` as content or control, as decided by `step`.
pub(crate) fn record(transcript: &mut Transcript, line: ServerLine, step: Step) {
    if step.is_content() {
        transcript.push(Event::Received(line));
    } else {
        transcript.push(Event::Control(line));
    }
}

/// Reads the next line, treating end of stream as a failure.
pub(crate) fn expect_line<S>(connection: &mut Connection<S>) -> Result<ServerLine, SessionError>
where
    S: Read + Write,
{
    connection.receive()?.ok_or(SessionError::StreamClosed)
}

/// Reads a full reply into `transcript` and reports how it ended.
///
/// Every line, including the final status, is recorded as it arrives so a
/// truncated reply still shows what was received.
pub(crate) fn read_reply<S>(
    connection: &mut Connection<S>,
    transcript: &mut Transcript,
) -> Result<Outcome, SessionError>
where
    S: Read + Write,
{
    let mut framing = ReplyFraming::default();
    loop {
        let line = expect_line(connection)?;
        let step = framing.step(&line);
        record(transcript, line, step);
        if let Step::End(outcome) = step {
            tracing::debug!(?outcome, "reply complete");
            return Ok(outcome);
        }
    }
}

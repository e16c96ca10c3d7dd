//! Dictionary queries: listing databases, defining words, and matching words.

use std::io::{Read, Write};

use super::reply::{Outcome, ReplyFraming, Step, expect_line, read_reply, record};
use super::{Event, Notice, Session, SessionError, Transcript};
use crate::protocol::{ALL_DICTIONARIES, Request, Strategy};
use crate::transport::{Connection, Connector};

impl<C> Session<C>
where
    C: Connector,
{
    /// Lists the databases offered by the server (`SHOW DB`).
    ///
    /// Lines up to the `.` terminator are shown as they arrive. The status
    /// line that follows the terminator is read so the stream stays aligned;
    /// only debug mode shows it, and only debug mode requires it.
    pub fn list_dictionaries(&mut self) -> Transcript {
        let require_trailer = self.mode.is_debug();
        self.exchange(|connection, transcript| {
            send(connection, transcript, Request::ShowDatabases)?;
            let mut framing = ReplyFraming::default();
            loop {
                let line = expect_line(connection)?;
                let step = framing.step(&line);
                record(transcript, line, step);
                match step {
                    Step::Continue => {}
                    Step::BlockClosed => break,
                    Step::End(outcome) => {
                        tracing::debug!(?outcome, "listing refused");
                        return Ok(());
                    }
                }
            }
            if require_trailer {
                let trailer = expect_line(connection)?;
                transcript.push(Event::Framing(trailer));
            } else if let Some(trailer) = connection.receive()? {
                transcript.push(Event::Framing(trailer));
            } else {
                tracing::debug!("server closed after the listing");
            }
            Ok(())
        })
    }

    /// Looks up the definitions of `word` in the current dictionary.
    ///
    /// In quiet mode a `552` triggers a single fallback `MATCH * . <word>`
    /// across every dictionary. Debug mode shows the raw exchange only.
    pub fn define(&mut self, word: &str) -> Transcript {
        let request = Request::define(&self.dictionary, word);
        let recover = !self.mode.is_debug();
        self.exchange(|connection, transcript| {
            send(connection, transcript, request)?;
            let outcome = read_reply(connection, transcript)?;
            if !recover {
                return Ok(());
            }
            match outcome {
                Outcome::NoMatch => {
                    transcript.notice(Notice::NoDefinition);
                    search_everywhere(connection, transcript, word)
                }
                Outcome::NoDatabase => {
                    transcript.notice(Notice::NoDictionary);
                    Ok(())
                }
                Outcome::Completed | Outcome::Rejected => Ok(()),
            }
        })
    }

    /// Finds words in the current dictionary that match `word` exactly.
    pub fn match_word(&mut self, word: &str) -> Transcript {
        self.find(Strategy::Exact, word, Notice::NoMatches)
    }

    /// Finds words in the current dictionary that start with `prefix`.
    pub fn prefix_match(&mut self, prefix: &str) -> Transcript {
        self.find(Strategy::Prefix, prefix, Notice::NoPrefixMatches)
    }

    fn find(&mut self, strategy: Strategy, word: &str, empty: Notice) -> Transcript {
        let request = Request::find(&self.dictionary, strategy, word);
        self.exchange(|connection, transcript| {
            send(connection, transcript, request)?;
            match read_reply(connection, transcript)? {
                Outcome::NoDatabase => transcript.notice(Notice::NoDictionary),
                Outcome::NoMatch => transcript.notice(empty),
                Outcome::Completed | Outcome::Rejected => {}
            }
            Ok(())
        })
    }
}

/// Fallback lookup issued when the selected dictionary has no definition.
fn search_everywhere<S>(
    connection: &mut Connection<S>,
    transcript: &mut Transcript,
    word: &str,
) -> Result<(), SessionError>
where
    S: Read + Write,
{
    let request = Request::find(ALL_DICTIONARIES, Strategy::ServerDefault, word);
    send(connection, transcript, request)?;
    match read_reply(connection, transcript)? {
        Outcome::NoMatch => transcript.notice(Notice::NoDefinitionAnywhere),
        Outcome::NoDatabase => transcript.notice(Notice::NoDictionary),
        Outcome::Completed | Outcome::Rejected => {}
    }
    Ok(())
}

fn send<S>(
    connection: &mut Connection<S>,
    transcript: &mut Transcript,
    request: Request,
) -> Result<(), SessionError>
where
    S: Read + Write,
{
    connection.send(&request)?;
    transcript.push(Event::Sent(request));
    Ok(())
}

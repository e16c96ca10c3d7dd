//! Protocol session engine.
//!
//! A [`Session`] owns the control connection, the selected dictionary, and the
//! display mode. Each operation writes its request, consumes the complete
//! reply, and returns a [`Transcript`] for the dispatcher to render. Failures
//! are reported inside the transcript rather than returned: a connect failure
//! leaves the session disconnected but usable, and a stream failure drops the
//! connection so the session reflects what happened on the wire.

mod error;
mod lookup;
mod reply;
mod transcript;

use std::io::{Read, Write};

use crate::protocol::{ALL_DICTIONARIES, Request};
use crate::transport::{Connection, Connector};

pub use error::SessionError;
pub use transcript::{DisplayMode, Event, INBOUND_MARKER, Notice, OUTBOUND_MARKER, Transcript};

/// State of one interactive dictionary session.
pub struct Session<C>
where
    C: Connector,
{
    connector: C,
    connection: Option<Connection<C::Stream>>,
    dictionary: String,
    mode: DisplayMode,
}

impl<C> Session<C>
where
    C: Connector,
{
    /// Creates a disconnected session searching all dictionaries.
    pub fn new(connector: C, mode: DisplayMode) -> Self {
        Self {
            connector,
            connection: None,
            dictionary: ALL_DICTIONARIES.to_owned(),
            mode,
        }
    }

    /// Display mode chosen at startup.
    pub const fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// Returns true while a control connection is open.
    pub const fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Connects to `host` on `port` and consumes the server greeting.
    ///
    /// A missing or unreadable greeting does not undo the connection.
    pub fn open(&mut self, host: &str, port: u16) -> Transcript {
        let mut transcript = Transcript::default();
        if self.is_connected() {
            transcript.push(Event::Failure(SessionError::AlreadyConnected));
            return transcript;
        }

        tracing::info!(host, port, "opening control connection");
        let stream = match self.connector.connect(host, port) {
            Ok(stream) => stream,
            Err(source) => {
                tracing::info!(host, port, error = %source, "control connection failed");
                transcript.push(Event::Failure(SessionError::Connect {
                    host: host.to_owned(),
                    port,
                    source,
                }));
                return transcript;
            }
        };

        let mut connection = Connection::new(stream);
        match connection.receive() {
            Ok(Some(greeting)) => transcript.push(Event::Framing(greeting)),
            Ok(None) => tracing::debug!(host, port, "server closed before sending a greeting"),
            Err(error) => tracing::debug!(host, port, %error, "failed to read server greeting"),
        }
        self.connection = Some(connection);
        transcript
    }

    /// Sends `QUIT` and drops the connection.
    pub fn close(&mut self) -> Transcript {
        let mut transcript = Transcript::default();
        match self.connection.take() {
            Some(connection) => say_goodbye(connection, &mut transcript),
            None => transcript.push(Event::Failure(SessionError::NotConnected)),
        }
        transcript
    }

    /// Like [`Session::close`], but a missing connection is not an error.
    ///
    /// The caller ends the program afterwards.
    pub fn quit(&mut self) -> Transcript {
        let mut transcript = Transcript::default();
        if let Some(connection) = self.connection.take() {
            say_goodbye(connection, &mut transcript);
        }
        transcript
    }

    /// Selects the dictionary used by later lookups. No I/O is performed and
    /// the name is not checked against the server.
    pub fn set_dictionary(&mut self, name: &str) {
        name.clone_into(&mut self.dictionary);
    }

    /// Dictionary used by lookups; `*` searches every database.
    pub fn current_dictionary(&self) -> &str {
        &self.dictionary
    }

    fn connection_mut(&mut self) -> Result<&mut Connection<C::Stream>, SessionError> {
        self.connection.as_mut().ok_or(SessionError::NotConnected)
    }

    /// Runs one exchange, recording any failure in the transcript.
    fn exchange<F>(&mut self, operation: F) -> Transcript
    where
        F: FnOnce(&mut Connection<C::Stream>, &mut Transcript) -> Result<(), SessionError>,
    {
        let mut transcript = Transcript::default();
        let result = self
            .connection_mut()
            .and_then(|connection| operation(connection, &mut transcript));
        if let Err(error) = result {
            if error.closes_connection() {
                tracing::info!(%error, "dropping control connection");
                self.connection = None;
            }
            transcript.push(Event::Failure(error));
        }
        transcript
    }
}

fn say_goodbye<S>(mut connection: Connection<S>, transcript: &mut Transcript)
where
    S: Read + Write,
{
    let request = Request::Quit;
    if let Err(error) = connection.send(&request) {
        tracing::info!(%error, "failed to send QUIT");
        return;
    }
    transcript.push(Event::Sent(request));
    match connection.receive() {
        Ok(Some(line)) => transcript.push(Event::Framing(line)),
        Ok(None) => {}
        Err(error) => tracing::debug!(%error, "no reply to QUIT"),
    }
    tracing::info!("control connection closed");
}

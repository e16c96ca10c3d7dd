//! In-memory connector whose server side is a fixed script.
//!
//! Everything the server will ever send is queued up front, and everything
//! the client writes is captured for later inspection. Tests therefore run
//! without sockets or threads.

use std::cell::{Cell, RefCell};
use std::io::{self, Cursor, Read, Write};
use std::rc::Rc;

use crate::transport::Connector;

/// Connector handing out [`ScriptedStream`]s.
#[derive(Default)]
pub(crate) struct ScriptedConnector {
    script: Vec<u8>,
    written: Rc<RefCell<Vec<u8>>>,
    attempts: Rc<Cell<usize>>,
    refuse: bool,
}

impl ScriptedConnector {
    /// A server that sends `lines` (CRLF terminated) and then closes.
    pub(crate) fn replying(lines: &[&str]) -> Self {
        let mut script = Vec::new();
        for line in lines {
            script.extend_from_slice(line.as_bytes());
            script.extend_from_slice(b"\r\n");
        }
        Self {
            script,
            ..Self::default()
        }
    }

    /// A server that refuses every connection.
    pub(crate) fn refusing() -> Self {
        Self {
            refuse: true,
            ..Self::default()
        }
    }

    /// Handle for reading what the client sent after the connector has been
    /// moved into a session.
    pub(crate) fn wire(&self) -> Wire {
        Wire {
            written: Rc::clone(&self.written),
            attempts: Rc::clone(&self.attempts),
        }
    }
}

impl Connector for ScriptedConnector {
    type Stream = ScriptedStream;

    fn connect(&self, _host: &str, _port: u16) -> io::Result<ScriptedStream> {
        self.attempts.set(self.attempts.get() + 1);
        if self.refuse {
            return Err(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "connection refused",
            ));
        }
        Ok(ScriptedStream {
            input: Cursor::new(self.script.clone()),
            written: Rc::clone(&self.written),
        })
    }
}

/// Client side of the scripted server.
pub(crate) struct ScriptedStream {
    input: Cursor<Vec<u8>>,
    written: Rc<RefCell<Vec<u8>>>,
}

impl Read for ScriptedStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.input.read(buf)
    }
}

impl Write for ScriptedStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.written.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Observer for traffic sent through a [`ScriptedConnector`].
pub(crate) struct Wire {
    written: Rc<RefCell<Vec<u8>>>,
    attempts: Rc<Cell<usize>>,
}

impl Wire {
    /// Request lines sent so far, without line endings.
    pub(crate) fn requests(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.written.borrow())
            .lines()
            .map(str::to_owned)
            .collect()
    }

    /// Number of connect attempts made.
    pub(crate) fn attempts(&self) -> usize {
        self.attempts.get()
    }
}

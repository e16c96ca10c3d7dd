//! Socket transport for the control connection.
//!
//! Connecting goes through the [`Connector`] trait so the session engine can be
//! driven by real TCP sockets in the binary and by scripted in-memory streams
//! in tests. The resulting stream is wrapped in a [`Connection`] that owns the
//! buffered reader and writes requests through it.

use std::io::{self, BufReader, Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::protocol::{Request, ServerLine, read_server_line};

/// Opens byte streams to a dictionary server.
pub trait Connector {
    /// Stream produced by a successful connect.
    type Stream: Read + Write;

    /// Connects to `host` on `port`.
    fn connect(&self, host: &str, port: u16) -> io::Result<Self::Stream>;
}

/// Connects over TCP with a bounded connect timeout.
#[derive(Debug, Clone, Copy)]
pub struct TcpConnector {
    timeout: Duration,
}

impl TcpConnector {
    /// Builds a connector that gives up connecting after `timeout`.
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Connector for TcpConnector {
    type Stream = TcpStream;

    fn connect(&self, host: &str, port: u16) -> io::Result<TcpStream> {
        let addresses = (host, port).to_socket_addrs()?;
        connect_any(addresses, self.timeout)
    }
}

/// Tries each address in turn and returns the first stream that connects.
///
/// When every attempt fails, the error from the last attempt is returned.
fn connect_any<I>(addresses: I, timeout: Duration) -> io::Result<TcpStream>
where
    I: IntoIterator<Item = SocketAddr>,
{
    let mut last_error = None;
    for address in addresses {
        match TcpStream::connect_timeout(&address, timeout) {
            Ok(stream) => return Ok(stream),
            Err(error) => {
                tracing::debug!(%address, %error, "connect attempt failed");
                last_error = Some(error);
            }
        }
    }
    Err(last_error.unwrap_or_else(|| {
        io::Error::new(io::ErrorKind::AddrNotAvailable, "no resolved addresses")
    }))
}

/// An open control connection.
///
/// Dropping the connection closes the underlying stream.
pub(crate) struct Connection<S>
where
    S: Read + Write,
{
    stream: BufReader<S>,
}

impl<S> Connection<S>
where
    S: Read + Write,
{
    pub(crate) fn new(stream: S) -> Self {
        Self {
            stream: BufReader::new(stream),
        }
    }

    /// Writes one request line.
    pub(crate) fn send(&mut self, request: &Request) -> io::Result<()> {
        tracing::debug!(request = %request, "sending request");
        request.write_line(self.stream.get_mut())
    }

    /// Reads one reply line, or `None` once the server has closed the stream.
    pub(crate) fn receive(&mut self) -> io::Result<Option<ServerLine>> {
        let line = read_server_line(&mut self.stream)?;
        if let Some(line) = line.as_ref() {
            tracing::trace!(line = line.text(), "received line");
        }
        Ok(line)
    }
}

//! Fake dictionary server for behavioural tests.
//!
//! Provides a TCP server thread that greets the client, answers each request
//! line from a script, and records the requests it saw. Tests can then assert
//! on both the CLI output and the exact wire traffic.

use std::io::{self, BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};

const GREETING: &str = "220 fake.dict.test dictd 1.13 <auth.mime> <1.2@fake>";
const QUIT_REPLY: &str = "221 bye";
const UNKNOWN_REPLY: &str = "500 unknown command";

/// One scripted request and its reply.
#[derive(Debug, Clone)]
struct Exchange {
    request: String,
    reply: Vec<String>,
    hang_up: bool,
}

/// Replies a [`FakeServer`] gives, keyed by request line.
///
/// Each scripted exchange is used once, in order, so a request repeated in a
/// test can receive different replies.
#[derive(Debug, Clone, Default)]
pub(crate) struct ServerScript {
    exchanges: Vec<Exchange>,
}

impl ServerScript {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Answers `request` with `reply`.
    pub(crate) fn on(self, request: &str, reply: &[&str]) -> Self {
        self.push(request, reply, false)
    }

    /// Answers `request` with `reply` and then closes the connection.
    pub(crate) fn on_then_hang_up(self, request: &str, reply: &[&str]) -> Self {
        self.push(request, reply, true)
    }

    fn push(mut self, request: &str, reply: &[&str], hang_up: bool) -> Self {
        self.exchanges.push(Exchange {
            request: request.to_owned(),
            reply: reply.iter().map(|line| (*line).to_owned()).collect(),
            hang_up,
        });
        self
    }

    fn take(&mut self, request: &str) -> Option<Exchange> {
        let index = self
            .exchanges
            .iter()
            .position(|exchange| exchange.request == request)?;
        Some(self.exchanges.remove(index))
    }
}

/// A fake server that accepts a single connection and plays a script.
pub(crate) struct FakeServer {
    port: u16,
    requests: Arc<Mutex<Vec<String>>>,
    result: Arc<Mutex<Option<Result<()>>>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl FakeServer {
    /// Spawns a server listening on an ephemeral TCP port.
    pub(crate) fn spawn(script: ServerScript) -> Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", 0)).context("bind fake server")?;
        listener
            .set_nonblocking(true)
            .context("fake server nonblocking")?;
        let port = listener.local_addr().context("local addr")?.port();
        let requests: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let result: Arc<Mutex<Option<Result<()>>>> = Arc::new(Mutex::new(None));
        let requests_clone = Arc::clone(&requests);
        let result_clone = Arc::clone(&result);
        let handle = thread::spawn(move || {
            let outcome = Self::serve_client(&listener, script, &requests_clone);
            if let Ok(mut guard) = result_clone.lock() {
                *guard = Some(outcome);
            }
        });
        Ok(Self {
            port,
            requests,
            result,
            handle: Some(handle),
        })
    }

    pub(crate) fn port(&self) -> u16 {
        self.port
    }

    /// Waits for the server thread to finish and returns the recorded
    /// requests without line endings.
    pub(crate) fn take_requests(&mut self) -> Result<Vec<String>> {
        if let Some(handle) = self.handle.take() {
            handle
                .join()
                .map_err(|_| anyhow!("fake server thread panicked"))?;
        }
        if let Some(outcome) = self
            .result
            .lock()
            .map_err(|error| anyhow!("lock fake server result: {error}"))?
            .take()
        {
            outcome.context("fake server failed")?;
        }
        let requests = self
            .requests
            .lock()
            .map_err(|error| anyhow!("lock requests: {error}"))?;
        Ok(requests.clone())
    }

    fn serve_client(
        listener: &TcpListener,
        script: ServerScript,
        requests: &Arc<Mutex<Vec<String>>>,
    ) -> Result<()> {
        let deadline = Instant::now() + Duration::from_secs(2);
        loop {
            match listener.accept() {
                Ok((stream, _)) => {
                    stream
                        .set_nonblocking(false)
                        .context("fake server blocking stream")?;
                    return Self::converse(stream, script, requests);
                }
                Err(ref error)
                    if error.kind() == io::ErrorKind::WouldBlock && Instant::now() < deadline =>
                {
                    thread::sleep(Duration::from_millis(10));
                }
                Err(ref error) if error.kind() == io::ErrorKind::WouldBlock => {
                    // Nobody connected, e.g. the test never issued `open`.
                    return Ok(());
                }
                Err(error) => return Err(error).context("accept connection"),
            }
        }
    }

    fn converse(
        stream: TcpStream,
        mut script: ServerScript,
        requests: &Arc<Mutex<Vec<String>>>,
    ) -> Result<()> {
        let mut reader = BufReader::new(stream.try_clone().context("clone stream")?);
        let mut writer = stream;
        write_lines(&mut writer, &[GREETING]).context("write greeting")?;

        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).context("read request")? == 0 {
                return Ok(());
            }
            let request = line.trim_end_matches(['\r', '\n']).to_owned();
            requests
                .lock()
                .map_err(|error| anyhow!("lock requests: {error}"))?
                .push(request.clone());

            match script.take(&request) {
                Some(exchange) => {
                    write_lines(&mut writer, &exchange.reply).context("write reply")?;
                    if exchange.hang_up {
                        return Ok(());
                    }
                }
                None if request == "QUIT" => {
                    write_lines(&mut writer, &[QUIT_REPLY]).context("write quit reply")?;
                    return Ok(());
                }
                None => write_lines(&mut writer, &[UNKNOWN_REPLY]).context("write reply")?,
            }
        }
    }
}

impl Drop for FakeServer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Writes lines to a stream with CRLF endings and flushes.
pub(crate) fn write_lines<T>(stream: &mut impl Write, lines: &[T]) -> io::Result<()>
where
    T: AsRef<str>,
{
    for line in lines {
        stream.write_all(line.as_ref().as_bytes())?;
        stream.write_all(b"\r\n")?;
    }
    stream.flush()
}

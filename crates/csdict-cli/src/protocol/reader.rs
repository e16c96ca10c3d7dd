//! Line reader for server replies.

use std::io::{self, BufRead};

use super::ServerLine;

/// Reads the next reply line.
///
/// Returns `Ok(None)` once the server has closed the stream. Bytes that are
/// not valid UTF-8 are replaced rather than rejected.
pub(crate) fn read_server_line<R>(reader: &mut R) -> io::Result<Option<ServerLine>>
where
    R: BufRead,
{
    let mut buffer = Vec::new();
    if reader.read_until(b'\n', &mut buffer)? == 0 {
        return Ok(None);
    }
    Ok(Some(ServerLine::parse(&String::from_utf8_lossy(&buffer))))
}

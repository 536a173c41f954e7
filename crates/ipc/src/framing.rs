use std::io::{self, Read, Write};
use std::os::unix::net::UnixStream;

use crate::error::IpcError;

/// A command line must fit in this many bytes before the trailing newline,
/// matching the wire protocol's fixed small-command contract.
pub const MAX_COMMAND_LINE_BYTES: usize = 80;

const COPY_BUFFER_SIZE: usize = 1024;

fn is_retriable(err: &io::Error) -> bool {
    matches!(err.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted)
}

/// Writes all of `buf`, looping silently past `EAGAIN`/`EWOULDBLOCK`/`EINTR`.
pub(crate) fn write_all_retry(stream: &UnixStream, mut buf: &[u8]) -> Result<(), IpcError> {
    while !buf.is_empty() {
        match (&*stream).write(buf) {
            Ok(0) => {
                return Err(IpcError::Io(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "socket write returned zero bytes",
                )))
            }
            Ok(n) => buf = &buf[n..],
            Err(e) if is_retriable(&e) => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

/// Sends `line` followed by a single `\n`.
pub(crate) fn send_line(stream: &UnixStream, line: &str) -> Result<(), IpcError> {
    write_all_retry(stream, line.as_bytes())?;
    write_all_retry(stream, b"\n")
}

/// Reads one line terminated by `\n` or end-of-stream.
///
/// A line that grows past [`MAX_COMMAND_LINE_BYTES`] without a terminator is
/// reported back as the literal string `"error"`, matching the original
/// transport's fixed small-command contract.
pub(crate) fn receive_line(stream: &UnixStream) -> Result<String, IpcError> {
    let mut line = String::with_capacity(MAX_COMMAND_LINE_BYTES);
    let mut byte = [0u8; 1];
    loop {
        if line.len() >= MAX_COMMAND_LINE_BYTES {
            return Ok("error".to_string());
        }
        match (&*stream).read(&mut byte) {
            Ok(0) => return Ok(line),
            Ok(_) => {
                if byte[0] == b'\n' {
                    return Ok(line);
                }
                line.push(byte[0] as char);
            }
            Err(e) if is_retriable(&e) => continue,
            Err(e) => return Err(e.into()),
        }
    }
}

/// Streams every byte of `reader` to the socket until EOF.
pub(crate) fn send_file(stream: &UnixStream, reader: &mut impl Read) -> Result<(), IpcError> {
    let mut buffer = [0u8; COPY_BUFFER_SIZE];
    loop {
        let n = match reader.read(&mut buffer) {
            Ok(0) => return Ok(()),
            Ok(n) => n,
            Err(e) if is_retriable(&e) => continue,
            Err(e) => return Err(e.into()),
        };
        write_all_retry(stream, &buffer[..n])?;
    }
}

/// Copies every byte available on the socket, until end-of-stream, into
/// `writer`.
pub(crate) fn receive_file(stream: &UnixStream, writer: &mut impl Write) -> Result<(), IpcError> {
    let mut buffer = [0u8; COPY_BUFFER_SIZE];
    loop {
        match (&*stream).read(&mut buffer) {
            Ok(0) => return Ok(()),
            Ok(n) => writer.write_all(&buffer[..n])?,
            Err(e) if is_retriable(&e) => continue,
            Err(e) => return Err(e.into()),
        }
    }
}

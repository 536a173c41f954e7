use std::io::{Read, Write};
use std::os::unix::net::UnixStream;

use crate::error::IpcError;
use crate::framing;

const OPTIONS_DELIMITER: char = ',';

/// One accepted connection on the server side: read the command, dispatch
/// it, optionally exchange a file blob, then the caller drops this to
/// close.
pub struct Connection {
    stream: UnixStream,
}

impl Connection {
    pub(crate) fn new(stream: UnixStream) -> Self {
        Self { stream }
    }

    /// Reads the command line and splits it into the command word and its
    /// comma-separated options. Blank fields (a leading or doubled comma)
    /// are dropped.
    pub fn receive_command(&mut self) -> Result<(String, Vec<String>), IpcError> {
        let line = framing::receive_line(&self.stream)?;
        tracing::debug!(%line, "received client command");

        let mut fields = line
            .split(OPTIONS_DELIMITER)
            .map(str::to_string)
            .filter(|s| !s.is_empty());
        let command = fields.next().unwrap_or_default();
        let options: Vec<String> = fields.collect();
        Ok((command, options))
    }

    /// Reads a file blob from the client into `writer`.
    pub fn receive_file(&mut self, writer: &mut impl Write) -> Result<(), IpcError> {
        framing::receive_file(&self.stream, writer)
    }

    /// Streams `reader` back to the client as a file blob reply.
    pub fn send_file(&mut self, reader: &mut impl Read) -> Result<(), IpcError> {
        framing::send_file(&self.stream, reader)
    }
}

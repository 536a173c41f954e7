use std::io::{Read, Write};
use std::os::unix::net::UnixStream;
use std::path::Path;

use crate::error::IpcError;
use crate::framing;

const OPTIONS_DELIMITER: char = ',';

/// The client side of one control-socket exchange: connect, send one
/// command line, optionally send or receive a file blob, then close.
pub struct Client {
    stream: UnixStream,
}

impl Client {
    /// Connects to the control socket at `path`.
    pub fn connect(path: &Path) -> Result<Self, IpcError> {
        let stream = UnixStream::connect(path)?;
        Ok(Self { stream })
    }

    /// Sends a bare command with no options.
    pub fn send_command(&mut self, command: &str) -> Result<(), IpcError> {
        self.send_command_with_options(command, &[])
    }

    /// Sends a command line with `options` appended, comma-separated.
    pub fn send_command_with_options(
        &mut self,
        command: &str,
        options: &[String],
    ) -> Result<(), IpcError> {
        let mut line = command.to_string();
        for opt in options {
            line.push(OPTIONS_DELIMITER);
            line.push_str(opt);
        }
        framing::send_line(&self.stream, &line)
    }

    /// Streams `reader` to the server as a file blob.
    pub fn send_file(&mut self, reader: &mut impl Read) -> Result<(), IpcError> {
        framing::send_file(&self.stream, reader)
    }

    /// Reads a file blob reply from the server into `writer`.
    pub fn receive_file(&mut self, writer: &mut impl Write) -> Result<(), IpcError> {
        framing::receive_file(&self.stream, writer)
    }
}

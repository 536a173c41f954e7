use std::path::PathBuf;

use thiserror::Error;

/// A failure of the control-socket transport.
///
/// Framing methods retry internally on `EAGAIN`/`EWOULDBLOCK`/`EINTR`; this
/// type is only ever returned for a non-retriable failure, matching the
/// "`SocketError` propagates on any other errno" design.
#[derive(Debug, Error)]
pub enum IpcError {
    /// The underlying socket operation failed.
    #[error("socket error: {0}")]
    Io(#[from] std::io::Error),

    /// The socket path exceeds `sockaddr_un`'s fixed-size buffer.
    #[error("socket path too long: {0}")]
    PathTooLong(PathBuf),
}

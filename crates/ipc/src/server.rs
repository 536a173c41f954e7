use std::io;
use std::os::unix::io::{AsRawFd, RawFd};
use std::os::unix::net::UnixListener;
use std::path::{Path, PathBuf};

use nix::sys::stat::{umask, Mode};

use crate::connection::Connection;
use crate::error::IpcError;

/// `sockaddr_un::sun_path` on Linux is 108 bytes including the terminating
/// NUL.
const MAX_SOCKET_PATH_BYTES: usize = 107;

/// The server side of the control socket: bind, listen, and accept
/// connections one at a time.
///
/// Bound group-readable (`umask 0007` during bind) so a member of the
/// daemon's group can connect without being root. The listening socket is
/// non-blocking so [`Server::accept`] can be polled from the event loop
/// alongside the sequencer file descriptor.
pub struct Server {
    listener: UnixListener,
    socket_path: PathBuf,
}

impl Server {
    /// Binds a fresh listening socket at `path`, removing any stale socket
    /// file left over from a previous run.
    pub fn bind(path: &Path) -> Result<Self, IpcError> {
        if path.as_os_str().len() > MAX_SOCKET_PATH_BYTES {
            return Err(IpcError::PathTooLong(path.to_path_buf()));
        }

        match std::fs::remove_file(path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(error = %e, path = %path.display(), "couldn't remove stale control socket"),
        }

        let previous_mask = umask(Mode::from_bits_truncate(0o007));
        let bind_result = UnixListener::bind(path);
        umask(previous_mask);

        let listener = bind_result?;
        listener.set_nonblocking(true)?;

        Ok(Self {
            listener,
            socket_path: path.to_path_buf(),
        })
    }

    /// Accepts one pending connection, or `None` if none is ready.
    pub fn accept(&self) -> Result<Option<Connection>, IpcError> {
        match self.listener.accept() {
            Ok((stream, _addr)) => {
                stream.set_nonblocking(false)?;
                Ok(Some(Connection::new(stream)))
            }
            Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted) => {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// The listening socket's file descriptor, for registration with a
    /// poll set.
    pub fn raw_fd(&self) -> RawFd {
        self.listener.as_raw_fd()
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.socket_path);
    }
}

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `ipc` implements the control-socket wire protocol: a Unix-domain stream
//! socket carrying one command line per exchange, plus an optional file
//! blob in either direction. [`Server`]/[`Connection`] are the daemon's
//! side; [`Client`] is the CLI's.
//!
//! # Design
//!
//! Framing lives in a private `framing` module shared by all three roles so
//! the retry-on-`EAGAIN`/`EWOULDBLOCK`/`EINTR` behavior is written exactly
//! once. The listening socket is the only non-blocking file descriptor;
//! accepted connections and the client's own socket use ordinary blocking
//! I/O, matching the single-client-at-a-time concurrency model.
//!
//! # Invariants
//!
//! - A command line never exceeds [`MAX_COMMAND_LINE_BYTES`] bytes before
//!   its newline; longer input is reported as `"error"` rather than
//!   silently truncated or blocking forever.
//! - [`Server::bind`] always leaves the process umask as it found it, even
//!   though the bind itself happens under a temporarily relaxed mask.
//!
//! # Errors
//!
//! [`IpcError`] wraps the underlying I/O failure; retriable errnos never
//! surface as this type.
//!
//! # See also
//!
//! - `daemon` for how `Server`'s file descriptor is registered with the
//!   event loop's multiplexor.
//! - `cli` for the `Client` call sequence behind each subcommand.

mod client;
mod connection;
mod error;
mod framing;
mod server;

pub use client::Client;
pub use connection::Connection;
pub use error::IpcError;
pub use framing::MAX_COMMAND_LINE_BYTES;
pub use server::Server;

use std::os::unix::io::RawFd;

use thiserror::Error;

use crate::address::Address;
use crate::event::{RawAddr, RawConnection, SeqEvent};

/// A fatal failure opening or operating the kernel sequencer handle.
///
/// Returned only from [`SequencerApi::begin`]: all other gateway methods
/// log and degrade gracefully rather than propagate an error, matching the
/// "mid-run kernel failures log and continue" error-handling design.
#[derive(Debug, Error)]
pub enum SeqError {
    /// The kernel API call named in `operation` failed with `code`.
    #[error("sequencer error {code} in {operation}")]
    Kernel {
        /// Negative `errno`-style code returned by the backend.
        code: i32,
        /// Name of the failing operation, for logs.
        operation: &'static str,
    },
}

/// Backend-agnostic view of the kernel's MIDI sequencer graph.
///
/// Implemented by the `live` feature's ALSA-backed gateway and, for tests,
/// by an in-memory fake. The daemon core only ever talks to this trait so
/// it can run its event-loop and truth-table logic against either backend.
pub trait SequencerApi {
    /// Opens the sequencer handle, names the client, and creates the
    /// internal announce-listening port. Idempotent: a second call on an
    /// already-open handle is a no-op.
    fn begin(&mut self) -> Result<(), SeqError>;

    /// Releases the sequencer handle, if open.
    fn end(&mut self);

    /// The client's name, or `""` for the system client or a client that
    /// has already exited.
    fn client_name(&mut self, client: i32) -> String;

    /// A short human-readable description of a client (kind, pid or card),
    /// or `"???"` if it cannot be queried.
    fn client_details(&mut self, client: i32) -> String;

    /// Resolves `addr` into an [`Address`], or `None` when the port does
    /// not exist, is `NO_EXPORT`, or grants neither subscription
    /// capability.
    fn address(&mut self, addr: RawAddr) -> Option<Address>;

    /// Every live client id, excluding the system client, in ascending
    /// order.
    fn scan_clients(&mut self) -> Vec<i32>;

    /// Every live port, in ascending `(client_id, port_id)` order. Callers
    /// rely on this order for primary-port computation.
    fn scan_ports(&mut self) -> Vec<RawAddr>;

    /// Every live subscription in the graph.
    fn scan_connections(&mut self) -> Vec<RawConnection>;

    /// Dequeues and returns one pending announcement event, or `None` if
    /// the queue is empty. Never blocks.
    fn event_input(&mut self) -> Option<SeqEvent>;

    /// Subscribes `sender` to `dest`. Idempotent: "already subscribed" is
    /// swallowed.
    fn connect(&mut self, sender: RawAddr, dest: RawAddr);

    /// Unsubscribes `conn`. Idempotent: "not subscribed" is swallowed.
    fn disconnect(&mut self, conn: RawConnection);

    /// File descriptors that must be added to the event loop's poll set.
    fn scan_fds(&self) -> Vec<RawFd>;
}

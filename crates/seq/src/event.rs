/// A raw `(client_id, port_id)` pair as reported by the kernel, before it
/// has been resolved (or found unresolvable) into an [`crate::Address`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RawAddr {
    /// Numeric client id.
    pub client: i32,
    /// Numeric port id.
    pub port: i32,
}

impl RawAddr {
    /// Builds a raw address pair.
    pub const fn new(client: i32, port: i32) -> Self {
        Self { client, port }
    }
}

/// A raw, unresolved subscription endpoint pair.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RawConnection {
    /// The sending port.
    pub sender: RawAddr,
    /// The receiving port.
    pub dest: RawAddr,
}

impl RawConnection {
    /// Builds a raw connection pair.
    pub const fn new(sender: RawAddr, dest: RawAddr) -> Self {
        Self { sender, dest }
    }
}

/// One sequencer announcement event, as delivered by
/// [`crate::SequencerApi::event_input`].
///
/// `ClientChange` and `PortChange` are carried through only so the core can
/// log and discard them; the kernel's exit events are considered
/// authoritative for cleanup, per the spec's note that `CHANGE` events are
/// unreliable.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SeqEvent {
    /// A new client appeared.
    ClientStart(i32),
    /// A client disappeared.
    ClientExit(i32),
    /// A client's metadata changed.
    ClientChange(i32),
    /// A new port appeared.
    PortStart(RawAddr),
    /// A port disappeared.
    PortExit(RawAddr),
    /// A port's metadata changed.
    PortChange(RawAddr),
    /// A subscription was made.
    PortSubscribed(RawConnection),
    /// A subscription was torn down.
    PortUnsubscribed(RawConnection),
}

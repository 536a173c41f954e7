#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `seq` wraps the kernel's ALSA-style sequencer graph: clients, ports, and
//! the subscriptions between them. [`SequencerApi`] is the single seam the
//! rest of the workspace talks through; [`Address`] and [`PortMap`] model
//! the graph state the daemon core keeps in memory.
//!
//! # Design
//!
//! The real backend, behind the `live` feature, is a thin wrapper over the
//! `alsa` crate's `snd_seq` bindings (see [`live`]). Tests and the `check`
//! CLI path run against an in-memory double implementing the same trait, so
//! none of the daemon's event-handling logic is coupled to the kernel.
//!
//! [`Address`] never carries its own `unsafe_code` impl for `#[deny]`
//! purposes: raw bindings stay inside the `live` module.
//!
//! # Invariants
//!
//! - [`PortMap::insert`] computes `primary_sender`/`primary_dest` once, at
//!   insertion time, against the ports already present for that client —
//!   it is never revised afterward. See [`PortMap`] for the full rationale.
//! - [`Address::can_be_sender`]/[`Address::can_be_dest`] are derived purely
//!   from the capability bitmask; `NO_EXPORT` always wins.
//!
//! # Errors
//!
//! [`SeqError`] is returned only from [`SequencerApi::begin`]; every other
//! method degrades (returns `None`/empty/no-op) on a kernel failure and
//! relies on the caller's logging.
//!
//! # See also
//!
//! - `rule` for the [`rule::MatchAddress`] trait [`Address`] implements.
//! - `engine` and `daemon` for how the port map and events drive the
//!   rule-matching algorithm.

mod address;
mod api;
mod event;
mod port_map;

#[cfg(feature = "live")]
pub mod live;

pub use address::{
    trim_port_name, Address, CAN_RECV, CAN_SEND, CAP_DUPLEX, CAP_SUBS_READ, CAP_SUBS_WRITE,
    CAP_SYNC_READ, CAP_SYNC_WRITE, CLIENT_SYSTEM, NO_EXPORT, TYPE_APPLICATION, TYPE_HARDWARE,
    TYPE_MIDI_GENERIC,
};
pub use api::{SeqError, SequencerApi};
pub use event::{RawAddr, RawConnection, SeqEvent};
pub use port_map::PortMap;

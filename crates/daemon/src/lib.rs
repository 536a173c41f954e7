#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `daemon` is the Minder Core: it owns the two rule lists, the live
//! port/connection graph, and the event loop that keeps them in sync with
//! the kernel sequencer and answers control-socket commands.
//!
//! # Design
//!
//! [`Core`] is generic over [`seq::SequencerApi`] so its truth-table and
//! event-dispatch logic can be driven in tests against
//! `test_support::FakeSequencer` without a live ALSA handle. Its
//! responsibilities are split across sibling modules by concern:
//! `state` (construction and resets), `ports` (port admission and
//! teardown), `connections` (the add/delete connection truth tables),
//! `events` (sequencer event dispatch), `control` (control-socket command
//! dispatch), and `run` (the poll loop tying them together).
//!
//! # Invariants
//!
//! - Every mutation to `activePorts`/`activeConnections` goes through one
//!   of `ports`/`connections`, keeping the expected-event bookkeeping and
//!   the rule engine invocation co-located with the state they protect.
//! - Once [`Core::start`] returns, only [`DaemonError::Platform`] can
//!   still surface (from a failed signal-handler install); every other
//!   runtime failure is logged and swallowed.
//!
//! # Errors
//!
//! [`DaemonError`] covers the fatal startup failures; see its variants.
//!
//! # See also
//!
//! - `engine` for the rule-matching algorithm `ports` calls into.
//! - `ipc` for the control-socket protocol `control`/`run` speak.
//! - `platform` for the signal register and poll wrapper `run` drives.

mod connections;
mod control;
mod error;
mod events;
mod ports;
mod run;
mod state;

pub use error::DaemonError;
pub use state::Core;

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `platform` holds the Unix-specific glue the daemon's event loop needs:
//! a lock-free sticky signal register and an fd-polling helper. Every
//! other crate in the workspace stays signal- and poll-free.
//!
//! # Design
//!
//! [`SignalRegister`] centralizes what would otherwise be scattered
//! process-global statics into one `Arc`-shared atomic, installed once at
//! startup and read once per event-loop wake-up. [`wait_readable`] is the
//! one place in the workspace that turns a bare `RawFd` into a
//! `BorrowedFd` without the compiler's help — everywhere else treats file
//! descriptors as opaque integers owned by `seq`/`ipc`.
//!
//! # Errors
//!
//! [`PlatformError`] wraps signal-installation and `poll(2)` failures;
//! both are fatal to the daemon (unlike per-event sequencer errors, which
//! `seq` degrades internally).
//!
//! # See also
//!
//! - `daemon` for the event loop that owns a [`SignalRegister`] and calls
//!   [`wait_readable`] once per wake-up.

mod error;
mod poll;
mod signal;

pub use error::PlatformError;
pub use poll::wait_readable;
pub use signal::{SignalRegister, SIG_HUP, SIG_NONE, SIG_TERMINATE};

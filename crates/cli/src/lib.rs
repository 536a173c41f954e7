#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `cli` holds the `clap`-derived argument types for both front-end
//! binaries and the full execution logic for `minderctl`'s subcommands.
//!
//! # Design
//!
//! [`minderd::MinderD`] is parsing only: wiring a live sequencer handle
//! into [`daemon::Core`] touches the `live`-feature-gated concrete
//! backend, which stays out of this crate so `minderctl`'s dependency
//! graph never pulls in ALSA bindings. [`minderctl::run`] is fully
//! self-contained, since every `minderctl` subcommand only ever talks to
//! the control socket or the local filesystem.
//!
//! # See also
//!
//! - `ipc::Client` for the control-socket exchange `minderctl` drives.
//! - `daemon` for the control-command handlers on the other end of that
//!   socket.

mod error;
/// `minderctl` subcommand argument types and execution logic.
pub mod minderctl;
/// `minderd` argument types.
pub mod minderd;

pub use error::CliError;

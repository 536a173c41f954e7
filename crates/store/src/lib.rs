#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `store` resolves where the daemon's persisted state lives and performs
//! the handful of file operations it needs: atomic writes, existence
//! checks that treat "missing" as "empty", and the `"-"` stdin/stdout
//! convention the CLI uses for `load`/`save`.
//!
//! # Design
//!
//! [`Paths`] centralizes environment-variable resolution so the rest of
//! the workspace never reads `STATE_DIRECTORY`/`RUNTIME_DIRECTORY`
//! directly. The free functions in this crate know nothing about rule
//! syntax; `rule::parse_rules` and the daemon core compose on top of the
//! raw text these functions return.
//!
//! # Invariants
//!
//! - [`write_file`] never leaves a partially-written file visible at its
//!   final path: content lands at `path.save` first and is renamed into
//!   place only after a successful `fsync`.
//! - [`read_file_or_empty`] never errors on a missing path; only a present
//!   -but-unreadable file is an error.
//!
//! # Errors
//!
//! All fallible operations return [`StoreError`], distinguishing I/O
//! failures from "this path exists but is the wrong kind of file".
//!
//! # See also
//!
//! - the `rule` crate's `parse_rules` for turning the text this crate
//!   reads into `ConnectionRule`s.
//! - `daemon` for the load/save/reset control-command handlers that drive
//!   this crate.

mod error;
mod file_ops;
mod paths;

pub use error::StoreError;
pub use file_ops::{file_exists, read_file, read_file_or_empty, read_user_file, write_file, write_user_file};
pub use paths::Paths;

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `rule` models the matching language used by the sequencer-graph
//! supervisor to decide which ports should be wired together. A
//! [`ConnectionRule`] is a pair of [`AddressSpec`]s (a sender side and a
//! destination side) plus a `blocking` flag; an [`AddressSpec`] is a
//! [`ClientSpec`] paired with a [`PortSpec`].
//!
//! # Design
//!
//! Matching never touches the sequencer gateway's concrete `Address` type
//! directly. Instead, callers implement [`MatchAddress`] for whatever port
//! representation they hold, keeping this crate a dependency leaf. The
//! engine and daemon crates borrow rules and addresses for the duration of
//! a single lookup rather than storing durable references, matching the
//! "transient scope" guidance for candidate-connection records.
//!
//! Text rendering and parsing live in [`parse`]; [`find_rule`] implements
//! the reverse-order "later rules win" lookup with the blocking-rule
//! override semantics described by the rule engine.
//!
//! # Invariants
//!
//! - `parse(render(r))` is a left-inverse for any [`ConnectionRule`]
//!   produced by this crate (case-insensitivity aside): see
//!   `tests::render_parse_round_trip` in [`parse`].
//! - [`find_rule`] scans its input in reverse; the first matching rule
//!   wins, so a later rule always overrides an earlier one.
//!
//! # Errors
//!
//! [`parse::RuleParseError`] carries a human-readable message; the
//! file-level parser in [`parse::parse_rules`] continues past a malformed
//! line, recording its 1-based line number, and reports whether every
//! line parsed cleanly.
//!
//! # See also
//!
//! - `engine` for how [`find_rule`] results compose across the profile and
//!   observed rule lists.
//! - `seq` for the `Address` type that implements [`MatchAddress`].

mod client_spec;
mod connection_rule;
mod port_spec;

pub mod parse;

pub use client_spec::ClientSpec;
pub use connection_rule::{find_rule, AddressSpec, ConnectionRule, RuleLookup};
pub use parse::{parse_address_spec, parse_line, parse_rules, LineError, ParseOutcome, RuleParseError};
pub use port_spec::{PortSpec, TYPE_APPLICATION, TYPE_HARDWARE, TYPE_MIDI_GENERIC};

/// The subset of a live port's attributes that the rule matcher needs.
///
/// Implemented by the sequencer gateway's `Address` type; kept as a trait
/// here so `rule` never depends on `seq`. `client_id`/`port_id` form the
/// numeric key used for equality and lookups elsewhere in the workspace.
pub trait MatchAddress {
    /// Numeric client id.
    fn client_id(&self) -> i32;
    /// Numeric port id.
    fn port_id(&self) -> i32;
    /// The `(client_id, port_id)` pair, used as a map key by callers.
    fn key(&self) -> (i32, i32) {
        (self.client_id(), self.port_id())
    }
    /// Client name as reported by the kernel.
    fn client_name(&self) -> &str;
    /// Trimmed, short port name.
    fn port_name(&self) -> &str;
    /// Untrimmed port name as reported by the kernel.
    fn port_long_name(&self) -> &str;
    /// Whether this port may act as the sender of a subscription.
    fn can_be_sender(&self) -> bool;
    /// Whether this port may act as the destination of a subscription.
    fn can_be_dest(&self) -> bool;
    /// Whether this is the lowest-numbered sendable port of its client.
    fn is_primary_sender(&self) -> bool;
    /// Whether this is the lowest-numbered receivable port of its client.
    fn is_primary_dest(&self) -> bool;
    /// Raw port-type bitmask (`SND_SEQ_PORT_TYPE_*`).
    fn type_bits(&self) -> u32;
}

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! Shared test fixtures for the minder workspace: [`FakeSequencer`], an
//! in-memory [`seq::SequencerApi`] double, and [`ScratchPaths`], a
//! throwaway `STATE_DIRECTORY`/`RUNTIME_DIRECTORY` pair backed by a temp
//! directory. Used by `daemon` and `cli` integration tests; never built
//! into a shipped binary.

mod fake_sequencer;
mod scratch;

pub use fake_sequencer::FakeSequencer;
pub use scratch::ScratchPaths;

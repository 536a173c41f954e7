#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` turns a `-v`/`-q` style verbosity count into a
//! `tracing-subscriber` filter, shared by both front-end binaries so
//! `minderd` and `minderctl` format logs identically.
//!
//! # Design
//!
//! [`Verbosity::init`] installs a global subscriber exactly once; callers
//! outside `main` never touch `tracing_subscriber` directly. `RUST_LOG`
//! always overrides the verbosity-derived filter, matching the common
//! convention of letting an explicit environment variable win over a CLI
//! flag.
//!
//! # See also
//!
//! - `cli` for where `Verbosity` is parsed from `-v`/`-q` flags.

use std::fmt;

use tracing_subscriber::EnvFilter;

/// A verbosity level selected by repeated `-v`/`-q` flags.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Only warnings and errors.
    Quiet,
    /// Warnings, errors, and per-connection/per-event info lines.
    #[default]
    Normal,
    /// `Normal` plus per-candidate rule-engine decisions.
    Verbose,
    /// Everything, including raw kernel event dumps.
    Debug,
}

impl Verbosity {
    /// Maps a `-v` count (and whether `-q` was given) to a level.
    ///
    /// `-q` wins outright; otherwise `verbose_count` of `0`, `1`, `2+` map
    /// to `Normal`, `Verbose`, `Debug`.
    pub fn from_flags(verbose_count: u8, quiet: bool) -> Self {
        if quiet {
            Self::Quiet
        } else {
            match verbose_count {
                0 => Self::Normal,
                1 => Self::Verbose,
                _ => Self::Debug,
            }
        }
    }

    fn directive(self) -> &'static str {
        match self {
            Self::Quiet => "warn",
            Self::Normal => "info",
            Self::Verbose => "debug",
            Self::Debug => "trace",
        }
    }

    /// Installs a process-global `tracing` subscriber at this verbosity.
    ///
    /// `RUST_LOG`, if set, takes precedence over the verbosity-derived
    /// directive. Returns an error if a subscriber is already installed;
    /// call this exactly once, from `main`.
    pub fn init(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.directive()));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init()
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.directive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_flag_wins_over_verbose_count() {
        assert_eq!(Verbosity::from_flags(3, true), Verbosity::Quiet);
    }

    #[test]
    fn verbose_count_escalates() {
        assert_eq!(Verbosity::from_flags(0, false), Verbosity::Normal);
        assert_eq!(Verbosity::from_flags(1, false), Verbosity::Verbose);
        assert_eq!(Verbosity::from_flags(2, false), Verbosity::Debug);
        assert_eq!(Verbosity::from_flags(9, false), Verbosity::Debug);
    }

    #[test]
    fn ordering_reflects_increasing_detail() {
        assert!(Verbosity::Quiet < Verbosity::Normal);
        assert!(Verbosity::Normal < Verbosity::Verbose);
        assert!(Verbosity::Verbose < Verbosity::Debug);
    }
}

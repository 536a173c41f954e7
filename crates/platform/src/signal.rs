use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::PlatformError;

/// No signal caught since the last [`SignalRegister::take`].
pub const SIG_NONE: usize = 0;
/// `SIGHUP` was caught: the event loop should perform a hard reset and keep
/// running.
pub const SIG_HUP: usize = 1;
/// `SIGINT` or `SIGTERM` was caught: the event loop should shut down
/// cleanly.
pub const SIG_TERMINATE: usize = 2;

/// The process's one piece of genuinely global state: a lock-free sticky
/// record of the most recent signal the event loop hasn't yet consumed.
///
/// `SIGHUP` maps to [`SIG_HUP`]; `SIGINT`/`SIGTERM` both map to
/// [`SIG_TERMINATE`]. After the first terminating signal, the disposition
/// for `SIGINT`/`SIGTERM` reverts to the OS default, so an impatient second
/// press kills the process outright rather than queuing behind a slow
/// shutdown.
pub struct SignalRegister {
    caught: Arc<AtomicUsize>,
    terminate_seen: Arc<AtomicBool>,
}

impl SignalRegister {
    /// Installs handlers for `SIGHUP`, `SIGINT`, and `SIGTERM`.
    pub fn install() -> Result<Self, PlatformError> {
        let caught = Arc::new(AtomicUsize::new(SIG_NONE));
        let terminate_seen = Arc::new(AtomicBool::new(false));

        signal_hook::flag::register_usize(signal_hook::consts::SIGHUP, Arc::clone(&caught), SIG_HUP)
            .map_err(PlatformError::SignalSetup)?;
        signal_hook::flag::register_usize(signal_hook::consts::SIGINT, Arc::clone(&caught), SIG_TERMINATE)
            .map_err(PlatformError::SignalSetup)?;
        signal_hook::flag::register_usize(signal_hook::consts::SIGTERM, Arc::clone(&caught), SIG_TERMINATE)
            .map_err(PlatformError::SignalSetup)?;
        signal_hook::flag::register_conditional_default(signal_hook::consts::SIGINT, Arc::clone(&terminate_seen))
            .map_err(PlatformError::SignalSetup)?;
        signal_hook::flag::register_conditional_default(signal_hook::consts::SIGTERM, Arc::clone(&terminate_seen))
            .map_err(PlatformError::SignalSetup)?;

        Ok(Self {
            caught,
            terminate_seen,
        })
    }

    /// Reads and clears the sticky signal flag.
    pub fn take(&self) -> usize {
        let signal = self.caught.swap(SIG_NONE, Ordering::SeqCst);
        if signal == SIG_TERMINATE {
            self.terminate_seen.store(true, Ordering::SeqCst);
        }
        signal
    }
}

use std::os::unix::io::RawFd;

use ipc::Server;
use platform::{SignalRegister, SIG_HUP, SIG_TERMINATE};
use seq::SequencerApi;

use crate::error::DaemonError;
use crate::state::Core;

impl<S: SequencerApi> Core<S> {
    /// Runs the event loop until a second `SIGINT`/`SIGTERM` reverts to the
    /// OS default disposition or the first one is observed here.
    ///
    /// Blocks in [`platform::wait_readable`] on the sequencer's file
    /// descriptors plus the control socket's listener; `SIGHUP` triggers a
    /// hard reset without otherwise interrupting the loop.
    pub fn run(&mut self, server: &Server) -> Result<(), DaemonError> {
        let signals = SignalRegister::install()?;

        loop {
            let seq_fds = self.sequencer_fds();
            let mut fds: Vec<RawFd> = seq_fds.clone();
            fds.push(server.raw_fd());

            match platform::wait_readable(&fds) {
                Ok(_) => {}
                Err(err) => {
                    tracing::error!(%err, "poll failed, continuing");
                    continue;
                }
            }

            match signals.take() {
                SIG_HUP => self.hard_reset(),
                SIG_TERMINATE => {
                    tracing::info!("terminating");
                    return Ok(());
                }
                _ => {}
            }

            self.drain_seq_events();

            loop {
                match server.accept() {
                    Ok(Some(mut conn)) => self.handle_control_connection(&mut conn),
                    Ok(None) => break,
                    Err(err) => {
                        tracing::warn!(%err, "accept failed, continuing");
                        break;
                    }
                }
            }
        }
    }
}

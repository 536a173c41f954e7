use std::os::unix::io::{BorrowedFd, RawFd};

use nix::poll::{PollFd, PollFlags, PollTimeout};

use crate::error::PlatformError;

/// Blocks until at least one of `fds` is readable or a signal interrupts
/// the wait, returning which positions in `fds` are ready.
///
/// `EINTR` is *not* retried here: a signal delivered while this call blocks
/// means the caller's handler has just recorded the interruption in the
/// sticky [`crate::SignalRegister`], and the event loop must re-check that
/// register before going back to sleep. Retrying internally would block
/// again without ever giving the caller that chance, so `EINTR` is reported
/// as "nothing ready" instead.
///
/// # Safety note
///
/// Building a `BorrowedFd` from a `RawFd` is unchecked: the caller must
/// ensure every fd in `fds` stays open for the duration of this call. The
/// daemon event loop satisfies this because it owns the sequencer handle
/// and the control-socket listener for its entire lifetime.
pub fn wait_readable(fds: &[RawFd]) -> Result<Vec<bool>, PlatformError> {
    let borrowed: Vec<BorrowedFd<'_>> = fds.iter().map(|&fd| unsafe { BorrowedFd::borrow_raw(fd) }).collect();
    let mut poll_fds: Vec<PollFd> = borrowed.iter().map(|fd| PollFd::new(*fd, PollFlags::POLLIN)).collect();

    match nix::poll::poll(&mut poll_fds, PollTimeout::NONE) {
        Ok(_) => Ok(poll_fds
            .iter()
            .map(|p| p.revents().is_some_and(|r| r.contains(PollFlags::POLLIN)))
            .collect()),
        Err(nix::errno::Errno::EINTR) => Ok(vec![false; fds.len()]),
        Err(e) => Err(PlatformError::Poll(e)),
    }
}

#[cfg(test)]
mod tests {
    use std::os::unix::io::AsRawFd;
    use std::time::{Duration, Instant};

    use nix::sys::signal::{self, SaFlags, SigAction, SigHandler, SigSet, SigmaskHow, Signal};
    use nix::unistd;

    use super::*;

    extern "C" fn noop_handler(_: i32) {}

    #[test]
    fn eintr_returns_immediately_instead_of_blocking_again() {
        // A pipe whose read end never becomes readable: if `wait_readable`
        // re-polled internally after `EINTR` instead of returning, this test
        // would hang rather than fail.
        let (read_fd, _write_fd) = unistd::pipe().unwrap();

        unsafe {
            signal::sigaction(
                Signal::SIGUSR1,
                &SigAction::new(SigHandler::Handler(noop_handler), SaFlags::empty(), SigSet::empty()),
            )
        }
        .unwrap();

        let pid = unistd::getpid();
        let sender = std::thread::spawn(move || {
            // Block the signal on this thread so the kernel delivers it to
            // the thread blocked in `poll`, not back to the sender.
            let mut only_sigusr1 = SigSet::empty();
            only_sigusr1.add(Signal::SIGUSR1);
            signal::sigprocmask(SigmaskHow::SIG_BLOCK, Some(&only_sigusr1), None).unwrap();

            std::thread::sleep(Duration::from_millis(50));
            signal::kill(pid, Signal::SIGUSR1).unwrap();
        });

        let started = Instant::now();
        let ready = wait_readable(&[read_fd.as_raw_fd()]).unwrap();
        sender.join().unwrap();

        assert!(started.elapsed() < Duration::from_secs(2));
        assert_eq!(ready, vec![false]);
    }
}

/// Failures from signal registration or fd polling.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    /// Installing a signal handler failed.
    #[error("could not install signal handler: {0}")]
    SignalSetup(#[source] std::io::Error),
    /// `poll(2)` failed for a reason other than `EINTR`.
    #[error("poll failed: {0}")]
    Poll(#[source] nix::errno::Errno),
}

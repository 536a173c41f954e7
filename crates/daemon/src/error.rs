use std::path::PathBuf;

/// Fatal startup failures. Once [`crate::Core::start`] returns `Ok`, the
/// daemon never surfaces an error again — mid-run failures are logged and
/// swallowed per the workspace's "keep running across transient kernel
/// hiccups" error-handling design.
#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    /// Opening the sequencer handle failed.
    #[error(transparent)]
    Sequencer(#[from] seq::SeqError),
    /// A persisted rule file could not be read.
    #[error(transparent)]
    Store(#[from] store::StoreError),
    /// A persisted rule file contained one or more malformed lines.
    #[error("{path}: {} malformed line(s)", .errors.len())]
    RuleFile {
        /// The offending file.
        path: PathBuf,
        /// One entry per malformed line, in file order.
        errors: Vec<rule::LineError>,
    },
    /// Binding the control socket failed.
    #[error(transparent)]
    Ipc(#[from] ipc::IpcError),
    /// Installing signal handlers failed.
    #[error(transparent)]
    Platform(#[from] platform::PlatformError),
}

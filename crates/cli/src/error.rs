/// A failure while executing a control-socket command from the CLI.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// The control socket could not be reached or the exchange failed.
    #[error("could not reach the daemon: {0}")]
    Ipc(#[from] ipc::IpcError),
    /// Reading or writing a local rule file failed.
    #[error(transparent)]
    Store(#[from] store::StoreError),
}

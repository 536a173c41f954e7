use std::path::PathBuf;

use thiserror::Error;

/// A failure resolving paths or reading/writing persisted state.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying filesystem operation failed.
    #[error("{context}: {source}")]
    Io {
        /// What the daemon was trying to do, for the log line.
        context: String,
        /// The underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// A path expected to be a directory (`STATE_DIRECTORY` /
    /// `RUNTIME_DIRECTORY`) is something else.
    #[error("{0}: not a directory")]
    NotADirectory(PathBuf),

    /// A path expected to be a regular rule file is something else.
    #[error("{0}: not a regular file")]
    NotARegularFile(PathBuf),
}

impl StoreError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

use std::path::PathBuf;

/// A scratch `STATE_DIRECTORY`/`RUNTIME_DIRECTORY` pair backed by a
/// temporary directory, for daemon/cli tests that need real paths on disk
/// without touching `/var/lib/minder` or `/run/minder`.
pub struct ScratchPaths {
    _dir: tempfile::TempDir,
    state_dir: PathBuf,
    runtime_dir: PathBuf,
}

impl ScratchPaths {
    /// Creates fresh `state`/`runtime` subdirectories under a new temp dir.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create scratch tempdir");
        let state_dir = dir.path().join("state");
        let runtime_dir = dir.path().join("runtime");
        std::fs::create_dir(&state_dir).expect("create scratch state dir");
        std::fs::create_dir(&runtime_dir).expect("create scratch runtime dir");
        Self {
            _dir: dir,
            state_dir,
            runtime_dir,
        }
    }

    /// The scratch state directory (holds `profile.rules`/`observed.rules`).
    pub fn state_dir(&self) -> &std::path::Path {
        &self.state_dir
    }

    /// The scratch runtime directory (holds `control.socket`).
    pub fn runtime_dir(&self) -> &std::path::Path {
        &self.runtime_dir
    }

    /// Path to the scratch control socket.
    pub fn socket_path(&self) -> PathBuf {
        self.runtime_dir.join("control.socket")
    }

    /// Path to the scratch profile rule file.
    pub fn profile_path(&self) -> PathBuf {
        self.state_dir.join("profile.rules")
    }

    /// Path to the scratch observed rule file.
    pub fn observed_path(&self) -> PathBuf {
        self.state_dir.join("observed.rules")
    }
}

impl Default for ScratchPaths {
    fn default() -> Self {
        Self::new()
    }
}

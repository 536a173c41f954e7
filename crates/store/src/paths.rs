use std::path::PathBuf;

use crate::error::StoreError;

const STATE_DIR_ENV: &str = "STATE_DIRECTORY";
const RUNTIME_DIR_ENV: &str = "RUNTIME_DIRECTORY";
const DEFAULT_STATE_DIR: &str = "/var/lib/minder";
const DEFAULT_RUNTIME_DIR: &str = "/run/minder";

/// Resolved filesystem locations for persisted rules and the control
/// socket.
///
/// Derived once at startup from `STATE_DIRECTORY`/`RUNTIME_DIRECTORY`, with
/// hard-coded defaults when unset. Service mode additionally verifies both
/// directories exist; client-mode tools (the `minderctl` CLI) skip that
/// check since they may run before the daemon has ever started.
#[derive(Clone, Debug)]
pub struct Paths {
    /// Directory holding `profile.rules` and `observed.rules`.
    pub state_dir: PathBuf,
    /// Directory holding `control.socket`.
    pub runtime_dir: PathBuf,
}

impl Paths {
    /// Resolves paths for the daemon: verifies both directories exist and
    /// are directories.
    pub fn for_service() -> Result<Self, StoreError> {
        Self::resolve(true)
    }

    /// Resolves paths for a CLI client: no existence check, since the
    /// daemon may not be running yet.
    pub fn for_client() -> Result<Self, StoreError> {
        Self::resolve(false)
    }

    fn resolve(check_presence: bool) -> Result<Self, StoreError> {
        let state_dir = resolve_dir(STATE_DIR_ENV, DEFAULT_STATE_DIR, check_presence)?;
        let runtime_dir = resolve_dir(RUNTIME_DIR_ENV, DEFAULT_RUNTIME_DIR, check_presence)?;
        Ok(Self {
            state_dir,
            runtime_dir,
        })
    }

    /// Path to the user-authored profile rule file.
    pub fn profile_path(&self) -> PathBuf {
        self.state_dir.join("profile.rules")
    }

    /// Path to the daemon-authored observed rule file.
    pub fn observed_path(&self) -> PathBuf {
        self.state_dir.join("observed.rules")
    }

    /// Path to the control socket.
    pub fn socket_path(&self) -> PathBuf {
        self.runtime_dir.join("control.socket")
    }
}

fn resolve_dir(env_var: &str, default: &str, check_presence: bool) -> Result<PathBuf, StoreError> {
    let (path, defaulted) = match std::env::var(env_var) {
        Ok(value) if !value.is_empty() => (PathBuf::from(value), false),
        _ => (PathBuf::from(default), true),
    };

    if check_presence {
        tracing::info!(
            env = env_var,
            path = %path.display(),
            defaulted,
            "resolved directory"
        );
        let metadata = std::fs::metadata(&path)
            .map_err(|e| StoreError::io(format!("checking directory {}", path.display()), e))?;
        if !metadata.is_dir() {
            return Err(StoreError::NotADirectory(path));
        }
    }

    Ok(path)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    // STATE_DIRECTORY/RUNTIME_DIRECTORY are process-global; serialize tests
    // that touch them so they don't stomp on each other under the default
    // multi-threaded test runner.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn client_mode_skips_presence_check() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::remove_var(STATE_DIR_ENV);
        std::env::remove_var(RUNTIME_DIR_ENV);
        let paths = Paths::for_client().unwrap();
        assert_eq!(paths.state_dir, PathBuf::from(DEFAULT_STATE_DIR));
        assert_eq!(paths.profile_path(), PathBuf::from("/var/lib/minder/profile.rules"));
        assert_eq!(paths.socket_path(), PathBuf::from("/run/minder/control.socket"));
    }

    #[test]
    fn service_mode_honors_env_override() {
        let _guard = ENV_LOCK.lock().unwrap();
        let dir = tempfile::tempdir().unwrap();
        std::env::set_var(STATE_DIR_ENV, dir.path());
        std::env::set_var(RUNTIME_DIR_ENV, dir.path());
        let paths = Paths::for_service().unwrap();
        assert_eq!(paths.state_dir, dir.path());
        std::env::remove_var(STATE_DIR_ENV);
        std::env::remove_var(RUNTIME_DIR_ENV);
    }

    #[test]
    fn service_mode_rejects_missing_directory() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var(STATE_DIR_ENV, "/nonexistent/minder/state/path");
        std::env::remove_var(RUNTIME_DIR_ENV);
        assert!(Paths::for_service().is_err());
        std::env::remove_var(STATE_DIR_ENV);
    }
}

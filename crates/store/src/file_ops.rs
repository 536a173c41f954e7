use std::io::{Read, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;

use crate::error::StoreError;

const STDIN_STDOUT_MARKER: &str = "-";

/// Whether `path` exists and is a regular file.
///
/// A missing path is `Ok(false)`, not an error — callers treat an absent
/// rule file as an empty one rather than a failure.
pub fn file_exists(path: &Path) -> Result<bool, StoreError> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => Ok(true),
        Ok(_) => Err(StoreError::NotARegularFile(path.to_path_buf())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(StoreError::io(format!("checking for {}", path.display()), e)),
    }
}

/// Reads `path` whole. Missing files are the caller's concern — this
/// always attempts the read and surfaces the `NotFound` as an error;
/// pair it with [`file_exists`] when "absent means empty" applies.
pub fn read_file(path: &Path) -> Result<String, StoreError> {
    std::fs::read_to_string(path).map_err(|e| StoreError::io(format!("could not read {}", path.display()), e))
}

/// Reads `path`, treating a nonexistent file as empty content.
pub fn read_file_or_empty(path: &Path) -> Result<String, StoreError> {
    if file_exists(path)? {
        read_file(path)
    } else {
        Ok(String::new())
    }
}

/// Writes `contents` to `path` atomically: write to `path.save` (created
/// mode `0600`, since rule files may reveal which devices a user has
/// plugged in), flush, then rename onto `path`.
pub fn write_file(path: &Path, contents: &str) -> Result<(), StoreError> {
    let temp_path = sibling_with_suffix(path, ".save");

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(&temp_path)
        .map_err(|e| StoreError::io(format!("could not write {}", temp_path.display()), e))?;
    file.write_all(contents.as_bytes())
        .map_err(|e| StoreError::io(format!("could not write {}", temp_path.display()), e))?;
    file.sync_all()
        .map_err(|e| StoreError::io(format!("could not write {}", temp_path.display()), e))?;
    drop(file);

    std::fs::rename(&temp_path, path).map_err(|e| {
        StoreError::io(
            format!("could not rename {} to {}", temp_path.display(), path.display()),
            e,
        )
    })
}

/// Reads `path`, or standard input when `path` is `"-"`.
pub fn read_user_file(path: &str) -> Result<String, StoreError> {
    if path == STDIN_STDOUT_MARKER {
        let mut contents = String::new();
        std::io::stdin()
            .read_to_string(&mut contents)
            .map_err(|e| StoreError::io("could not read stdin", e))?;
        Ok(contents)
    } else {
        read_file(Path::new(path))
    }
}

/// Writes `contents` to `path`, or standard output when `path` is `"-"`.
pub fn write_user_file(path: &str, contents: &str) -> Result<(), StoreError> {
    if path == STDIN_STDOUT_MARKER {
        let mut stdout = std::io::stdout();
        stdout
            .write_all(contents.as_bytes())
            .map_err(|e| StoreError::io("could not write stdout", e))?;
        stdout.flush().map_err(|e| StoreError::io("could not write stdout", e))
    } else {
        write_file(Path::new(path), contents)
    }
}

fn sibling_with_suffix(path: &Path, suffix: &str) -> std::path::PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    std::path::PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_empty_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("observed.rules");
        assert_eq!(read_file_or_empty(&path).unwrap(), "");
    }

    #[test]
    fn write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.rules");
        write_file(&path, "\"A\" --> \"B\"\n").unwrap();
        assert_eq!(read_file(&path).unwrap(), "\"A\" --> \"B\"\n");
    }

    #[test]
    fn write_file_leaves_no_temp_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.rules");
        write_file(&path, "x").unwrap();
        assert!(!sibling_with_suffix(&path, ".save").exists());
    }

    #[test]
    fn existing_directory_is_not_a_regular_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(file_exists(dir.path()).is_err());
    }
}

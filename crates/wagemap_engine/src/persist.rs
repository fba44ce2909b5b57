use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("target directory unavailable: {0}")]
    TargetDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Write bytes to `path` via a temp file in the same directory, so readers
/// never observe a partial cache file or dataset.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), PersistError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        // Bare filenames land in the working directory.
        _ => std::env::current_dir().map_err(|err| PersistError::TargetDir(err.to_string()))?,
    };
    fs::create_dir_all(&dir).map_err(|err| PersistError::TargetDir(err.to_string()))?;

    let mut tmp = NamedTempFile::new_in(&dir)?;
    tmp.write_all(contents)?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;

    // Replace any previous run's output.
    if path.exists() {
        fs::remove_file(path)?;
    }
    tmp.persist(path).map_err(|err| PersistError::Io(err.error))?;
    Ok(())
}

//! Filesystem utilities

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::info;

/// Create `path` and its parents if missing.
pub fn ensure_dir(path: impl AsRef<Path>) -> io::Result<()> {
    let path = path.as_ref();
    if path.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(path)?;
    info!("Created directory: {}", path.display());
    Ok(())
}

/// Path of `file_name` inside the data directory
pub fn data_file(data_dir: &str, file_name: &str) -> PathBuf {
    Path::new(data_dir).join(file_name)
}

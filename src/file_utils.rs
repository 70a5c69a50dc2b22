use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::Path;
use tempfile::NamedTempFile;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> io::Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Create the directory that will contain `path`, if any
    pub fn ensure_parent_dir<P: AsRef<Path>>(path: P) -> io::Result<()> {
        match path.as_ref().parent() {
            Some(parent) if !parent.as_os_str().is_empty() => Self::ensure_dir(parent),
            _ => Ok(()),
        }
    }

    /// Write bytes to a uniquely named temporary file in `dir`.
    ///
    /// The file is removed when the returned handle is dropped.
    pub fn write_temp_file<P: AsRef<Path>>(dir: P, prefix: &str, suffix: &str, content: &[u8]) -> io::Result<NamedTempFile> {
        let mut file = tempfile::Builder::new()
            .prefix(prefix)
            .suffix(suffix)
            .tempfile_in(dir)?;
        io::Write::write_all(&mut file, content)?;
        io::Write::flush(&mut file)?;
        Ok(file)
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        Self::ensure_parent_dir(&path)?;

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }
}

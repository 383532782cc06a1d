use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Writes the generated source file.
///
/// Content goes to a temporary file in the destination directory first and
/// is renamed over the target, so readers never observe a partial file.
pub struct FileWriter {
    output_path: PathBuf,
}

impl FileWriter {
    /// Prepare writing to `output_path`, creating its parent directory
    pub fn new(output_path: impl Into<PathBuf>) -> io::Result<Self> {
        let output_path = output_path.into();
        Self::ensure_directory_exists(&Self::parent_of(&output_path))?;
        Ok(Self { output_path })
    }

    fn parent_of(path: &Path) -> PathBuf {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Atomically replace the output file with `content`
    pub fn write(&self, content: &str) -> io::Result<()> {
        let directory = Self::parent_of(&self.output_path);
        let mut temp = NamedTempFile::new_in(&directory)?;
        temp.write_all(content.as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(&self.output_path).map_err(|err| err.error)?;
        Ok(())
    }

    /// Get the output path
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Create directory if it doesn't exist
    pub fn ensure_directory_exists(path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }
}

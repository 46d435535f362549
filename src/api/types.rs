use serde::Deserialize;
use std::path::{Path, PathBuf};

/// A local file chosen for upload
#[derive(Debug, Clone, PartialEq)]
pub struct LocalFile {
    /// Full path on disk
    pub path: PathBuf,
    /// File name sent to the backend (e.g., "report.pdf")
    pub name: String,
    /// Size in bytes at the time it was picked
    pub size: u64,
}

impl LocalFile {
    /// Read file metadata for a picked path
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let metadata = std::fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "not a regular file",
            ));
        }
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        Ok(LocalFile {
            path: path.to_path_buf(),
            name,
            size: metadata.len(),
        })
    }

    /// Size rounded to whole kilobytes, for display
    pub fn size_kb(&self) -> u64 {
        (self.size + 512) / 1024
    }
}

/// JSON acknowledgment returned by create-directory and upload
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Acknowledgment {
    #[serde(default)]
    pub message: Option<String>,
    /// Storage key of an uploaded file
    #[serde(default)]
    pub blob_name: Option<String>,
}

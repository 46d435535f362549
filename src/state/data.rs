/// Shared data structures for the view state
///
/// These types describe the transient status shown to the user
/// alongside the directory and file listings.

use std::fmt;
use thiserror::Error;

/// Lifecycle of the most recent upload
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UploadStatus {
    /// Nothing uploaded since the last file selection
    #[default]
    Idle,
    Uploading,
    Succeeded,
    Failed,
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UploadStatus::Idle => "",
            UploadStatus::Uploading => "Uploading file...",
            UploadStatus::Succeeded => "Upload successful!",
            UploadStatus::Failed => "Upload failed",
        };
        f.write_str(label)
    }
}

/// Local precondition failures. These never reach the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a directory name")]
    EmptyDirectoryName,
    #[error("Please select a file")]
    NoFileSelected,
    #[error("Please select a directory")]
    NoDirectorySelected,
    /// Limit is in whole megabytes (MiB, rounded to nearest)
    #[error("File size exceeds {limit_mb}MB limit")]
    FileTooLarge { limit_mb: u64 },
}

impl ValidationError {
    pub fn file_too_large(max_bytes: u64) -> Self {
        const MIB: u64 = 1024 * 1024;
        ValidationError::FileTooLarge {
            limit_mb: (max_bytes + MIB / 2) / MIB,
        }
    }
}

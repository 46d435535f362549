use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by the backend API client
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be sent or the response could not be received
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not the JSON we expected
    #[error("invalid response ({status}): {source}")]
    Decode {
        status: StatusCode,
        source: serde_json::Error,
    },

    /// The upload endpoint answered with a non-success status
    #[error("server rejected the upload: {status}")]
    UploadRejected { status: StatusCode },

    #[error("directory name must not be empty")]
    EmptyName,

    #[error("could not read {}: {source}", .path.display())]
    LocalFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("credential unavailable: {0}")]
    Credential(String),
}

impl ApiError {
    /// HTTP status attached to this error, if the server answered at all
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Decode { status, .. } | ApiError::UploadRejected { status } => Some(*status),
            ApiError::Transport(err) => err.status(),
            _ => None,
        }
    }
}

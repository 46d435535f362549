/// Executes controller requests
///
/// Each request becomes exactly one follow-up message. Errors are turned
/// into strings here because iced messages must be `Clone`.

use std::sync::Arc;
use tracing::debug;

use super::controller::{Message, Request};
use crate::api::{ApiError, FileBackend, LocalFile};

/// Run a request against the backend (or the native file picker)
pub async fn perform(backend: Arc<dyn FileBackend>, request: Request) -> Message {
    debug!(?request, "performing request");

    match request {
        Request::ListDirectories => {
            Message::DirectoriesLoaded(backend.list_directories().await.map_err(describe))
        }
        Request::ListFiles {
            directory,
            generation,
        } => {
            let result = backend.list_files(&directory).await.map_err(describe);
            Message::FilesLoaded {
                directory,
                generation,
                result,
            }
        }
        Request::CreateDirectory { name } => Message::DirectoryCreated(
            backend.create_directory(&name).await.map_err(describe),
        ),
        Request::Upload { directory, file } => Message::UploadFinished(
            backend
                .upload_file(&directory, &file)
                .await
                .map_err(describe),
        ),
        Request::PickFile => pick_local_file().await,
    }
}

fn describe(err: ApiError) -> String {
    if let Some(status) = err.status() {
        debug!(%status, "backend answered with an error status");
    }
    err.to_string()
}

/// Show the native file picker and read the chosen file's metadata
async fn pick_local_file() -> Message {
    let picked = rfd::AsyncFileDialog::new()
        .set_title("Select File to Upload")
        .pick_file()
        .await;

    let Some(handle) = picked else {
        return Message::FilePicked(None);
    };

    let path = handle.path().to_path_buf();
    match LocalFile::from_path(&path) {
        Ok(file) => Message::FilePicked(Some(file)),
        Err(e) => Message::FileUnreadable(format!("{}: {}", path.display(), e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Acknowledgment;
    use crate::state::{UploadStatus, ViewState};
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use std::collections::{BTreeMap, VecDeque};
    use std::path::PathBuf;
    use std::sync::Mutex;

    const TEN_MB: u64 = 10 * 1024 * 1024;

    /// In-memory backend that records every call it receives
    #[derive(Default)]
    struct FakeBackend {
        directories: Mutex<BTreeMap<String, Vec<String>>>,
        calls: Mutex<Vec<String>>,
        reject_uploads: bool,
    }

    impl FakeBackend {
        fn with_directories(names: &[&str]) -> Self {
            let backend = FakeBackend::default();
            {
                let mut directories = backend.directories.lock().unwrap();
                for name in names {
                    directories.insert(name.to_string(), Vec::new());
                }
            }
            backend
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl FileBackend for FakeBackend {
        async fn list_directories(&self) -> Result<Vec<String>, ApiError> {
            self.record("list_directories".into());
            Ok(self.directories.lock().unwrap().keys().cloned().collect())
        }

        async fn list_files(&self, directory: &str) -> Result<Vec<String>, ApiError> {
            self.record(format!("list_files {}", directory));
            Ok(self
                .directories
                .lock()
                .unwrap()
                .get(directory)
                .cloned()
                .unwrap_or_default())
        }

        async fn create_directory(&self, name: &str) -> Result<Acknowledgment, ApiError> {
            self.record(format!("create_directory {}", name));
            self.directories
                .lock()
                .unwrap()
                .entry(name.to_string())
                .or_default();
            Ok(Acknowledgment {
                message: Some(format!("Directory {} created successfully.", name)),
                blob_name: None,
            })
        }

        async fn upload_file(
            &self,
            directory: &str,
            file: &LocalFile,
        ) -> Result<Acknowledgment, ApiError> {
            self.record(format!("upload_file {} {}", directory, file.name));
            if self.reject_uploads {
                return Err(ApiError::UploadRejected {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                });
            }
            self.directories
                .lock()
                .unwrap()
                .entry(directory.to_string())
                .or_default()
                .push(file.name.clone());
            Ok(Acknowledgment {
                message: None,
                blob_name: Some(format!("{}/{}", directory, file.name)),
            })
        }
    }

    /// Feed a message through the controller, running every request it issues
    async fn drive(state: &mut ViewState, backend: &Arc<FakeBackend>, message: Message) {
        let backend: Arc<dyn FileBackend> = backend.clone();
        let mut pending = VecDeque::from([message]);
        while let Some(message) = pending.pop_front() {
            if let Some(request) = state.update(message) {
                pending.push_back(perform(backend.clone(), request).await);
            }
        }
    }

    fn local_file(name: &str, size: u64) -> LocalFile {
        LocalFile {
            path: PathBuf::from(format!("/tmp/{}", name)),
            name: name.to_string(),
            size,
        }
    }

    #[tokio::test]
    async fn test_created_directory_appears_in_listing() {
        let backend = Arc::new(FakeBackend::with_directories(&["invoices"]));
        let mut state = ViewState::new(TEN_MB);
        drive(&mut state, &backend, Message::LoadDirectories).await;
        assert_eq!(state.directories(), ["invoices"]);

        drive(&mut state, &backend, Message::NewDirectoryNameChanged("contracts".into())).await;
        drive(&mut state, &backend, Message::CreateDirectory).await;

        assert_eq!(state.directories(), ["contracts", "invoices"]);
        assert_eq!(state.new_directory_name(), "");
        assert!(!state.is_loading());
        assert_eq!(
            backend.calls(),
            ["list_directories", "create_directory contracts", "list_directories"]
        );
    }

    #[tokio::test]
    async fn test_empty_directory_lists_no_files() {
        let backend = Arc::new(FakeBackend::with_directories(&["empty"]));
        let mut state = ViewState::new(TEN_MB);
        drive(&mut state, &backend, Message::SelectDirectory("empty".into())).await;

        assert_eq!(state.selected_directory(), Some("empty"));
        assert!(state.files().is_empty());
    }

    #[tokio::test]
    async fn test_upload_round_trip() {
        let backend = Arc::new(FakeBackend::with_directories(&["contracts"]));
        let mut state = ViewState::new(TEN_MB);
        drive(&mut state, &backend, Message::SelectDirectory("contracts".into())).await;
        drive(&mut state, &backend, Message::FilePicked(Some(local_file("report.pdf", 2048)))).await;
        drive(&mut state, &backend, Message::Upload).await;

        assert_eq!(state.upload_status(), UploadStatus::Succeeded);
        assert_eq!(state.upload_status().to_string(), "Upload successful!");
        assert_eq!(state.selected_file(), None);
        assert_eq!(state.files(), ["report.pdf"]);
        assert!(!state.is_loading());
        assert_eq!(
            backend.calls(),
            [
                "list_files contracts",
                "upload_file contracts report.pdf",
                "list_files contracts"
            ]
        );
    }

    #[tokio::test]
    async fn test_local_rejections_make_no_calls() {
        let backend = Arc::new(FakeBackend::with_directories(&["contracts"]));
        let mut state = ViewState::new(TEN_MB);

        drive(&mut state, &backend, Message::FilePicked(Some(local_file("report.pdf", 10)))).await;
        drive(&mut state, &backend, Message::Upload).await;
        assert_eq!(state.error(), Some("Please select a directory"));

        drive(
            &mut state,
            &backend,
            Message::FilePicked(Some(local_file("video.mov", 11 * 1024 * 1024))),
        )
        .await;
        assert_eq!(state.error(), Some("File size exceeds 10MB limit"));

        drive(&mut state, &backend, Message::CreateDirectory).await;
        assert_eq!(state.error(), Some("Please enter a directory name"));

        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_upload_surfaces_status() {
        let backend = Arc::new(FakeBackend {
            reject_uploads: true,
            ..FakeBackend::with_directories(&["contracts"])
        });
        let mut state = ViewState::new(TEN_MB);
        drive(&mut state, &backend, Message::SelectDirectory("contracts".into())).await;
        drive(&mut state, &backend, Message::FilePicked(Some(local_file("report.pdf", 10)))).await;
        drive(&mut state, &backend, Message::Upload).await;

        assert_eq!(state.upload_status(), UploadStatus::Failed);
        assert_eq!(
            state.error(),
            Some("Upload failed: server rejected the upload: 500 Internal Server Error")
        );
        assert!(state.files().is_empty());
        assert!(!state.is_loading());
    }
}

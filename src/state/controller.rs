/// View controller: UI state plus the message handler that drives it
///
/// `ViewState::update` never performs I/O itself. It mutates state and
/// hands back at most one `Request`; the caller runs the request (see
/// effects.rs) and feeds the resulting `Message` back in.

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::data::{UploadStatus, ValidationError};
use crate::api::{Acknowledgment, LocalFile};

/// Application messages (user actions and request results)
#[derive(Debug, Clone)]
pub enum Message {
    /// Initial mount or the "Refresh" button
    LoadDirectories,
    DirectoriesLoaded(Result<Vec<String>, String>),
    /// User clicked a directory in the list
    SelectDirectory(String),
    FilesLoaded {
        directory: String,
        generation: u64,
        result: Result<Vec<String>, String>,
    },
    NewDirectoryNameChanged(String),
    CreateDirectory,
    DirectoryCreated(Result<Acknowledgment, String>),
    /// User clicked "Choose File"
    PickFile,
    /// Picker closed; `None` means the user cancelled
    FilePicked(Option<LocalFile>),
    FileUnreadable(String),
    Upload,
    UploadFinished(Result<Acknowledgment, String>),
}

/// Work the controller asks the caller to perform
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    ListDirectories,
    ListFiles { directory: String, generation: u64 },
    CreateDirectory { name: String },
    Upload { directory: String, file: LocalFile },
    /// Open the native file picker (no network involved)
    PickFile,
}

impl Request {
    /// Whether this request talks to the backend and so counts as loading
    pub fn is_network(&self) -> bool {
        !matches!(self, Request::PickFile)
    }
}

/// All state shown by the UI
#[derive(Debug)]
pub struct ViewState {
    directories: Vec<String>,
    /// Always replaced together with `files`
    selected_directory: Option<String>,
    files: Vec<String>,
    new_directory_name: String,
    /// What the file picker input currently shows
    picked_path: Option<PathBuf>,
    selected_file: Option<LocalFile>,
    upload_status: UploadStatus,
    error: Option<String>,
    /// Network requests issued but not yet answered
    in_flight: usize,
    /// Bumped for every file listing; older responses are dropped
    listing_generation: u64,
    /// Listing generation current when the last upload was issued
    upload_listing_generation: u64,
    max_upload_bytes: u64,
}

impl ViewState {
    pub fn new(max_upload_bytes: u64) -> Self {
        ViewState {
            directories: Vec::new(),
            selected_directory: None,
            files: Vec::new(),
            new_directory_name: String::new(),
            picked_path: None,
            selected_file: None,
            upload_status: UploadStatus::Idle,
            error: None,
            in_flight: 0,
            listing_generation: 0,
            upload_listing_generation: 0,
            max_upload_bytes,
        }
    }

    /// Handle a message and update state
    pub fn update(&mut self, message: Message) -> Option<Request> {
        match message {
            Message::LoadDirectories => {
                self.error = None;
                self.issue(Request::ListDirectories)
            }
            Message::DirectoriesLoaded(result) => {
                self.settle();
                match result {
                    Ok(directories) => {
                        info!("📁 Loaded {} directories", directories.len());
                        self.directories = directories;
                    }
                    Err(e) => self.fail("Loading directories", e),
                }
                None
            }
            Message::SelectDirectory(directory) => {
                self.error = None;
                self.next_listing(directory)
            }
            Message::FilesLoaded {
                directory,
                generation,
                result,
            } => {
                self.settle();
                if generation != self.listing_generation {
                    debug!(%directory, generation, "discarding stale file listing");
                    return None;
                }
                match result {
                    Ok(files) => {
                        info!("📄 {} files in {}", files.len(), directory);
                        self.selected_directory = Some(directory);
                        self.files = files;
                    }
                    Err(e) => self.fail("Loading files", e),
                }
                None
            }
            Message::NewDirectoryNameChanged(name) => {
                self.new_directory_name = name;
                None
            }
            Message::CreateDirectory => {
                let name = self.new_directory_name.trim();
                if name.is_empty() {
                    self.reject(ValidationError::EmptyDirectoryName);
                    return None;
                }
                let name = name.to_string();
                self.error = None;
                self.issue(Request::CreateDirectory { name })
            }
            Message::DirectoryCreated(result) => {
                self.settle();
                match result {
                    Ok(ack) => {
                        info!(
                            "✅ {}",
                            ack.message.as_deref().unwrap_or("Directory created")
                        );
                        self.new_directory_name.clear();
                        self.error = None;
                        self.issue(Request::ListDirectories)
                    }
                    Err(e) => {
                        // Input is kept so the user can retry
                        self.fail("Creating directory", e);
                        None
                    }
                }
            }
            Message::PickFile => self.issue(Request::PickFile),
            Message::FilePicked(None) => {
                self.reset_picker();
                None
            }
            Message::FilePicked(Some(file)) => {
                if file.size > self.max_upload_bytes {
                    warn!(
                        "⚠️  {} is {} bytes, over the {} byte limit",
                        file.name, file.size, self.max_upload_bytes
                    );
                    self.reject(ValidationError::file_too_large(self.max_upload_bytes));
                    self.reset_picker();
                    return None;
                }
                self.picked_path = Some(file.path.clone());
                self.selected_file = Some(file);
                self.upload_status = UploadStatus::Idle;
                self.error = None;
                None
            }
            Message::FileUnreadable(e) => {
                self.fail("Reading file", e);
                self.reset_picker();
                None
            }
            Message::Upload => {
                let Some(file) = self.selected_file.clone() else {
                    self.reject(ValidationError::NoFileSelected);
                    return None;
                };
                let Some(directory) = self.selected_directory.clone() else {
                    self.reject(ValidationError::NoDirectorySelected);
                    return None;
                };
                self.error = None;
                self.upload_status = UploadStatus::Uploading;
                self.upload_listing_generation = self.listing_generation;
                self.issue(Request::Upload { directory, file })
            }
            Message::UploadFinished(result) => {
                self.settle();
                match result {
                    Ok(ack) => {
                        info!(
                            "✅ Upload complete: {}",
                            ack.blob_name.as_deref().unwrap_or("(no blob name)")
                        );
                        self.upload_status = UploadStatus::Succeeded;
                        self.reset_picker();
                        // A directory picked mid-upload has its own listing pending
                        if self.listing_generation != self.upload_listing_generation {
                            debug!("skipping post-upload reload, newer listing pending");
                            return None;
                        }
                        match self.selected_directory.clone() {
                            Some(directory) => self.next_listing(directory),
                            None => None,
                        }
                    }
                    Err(e) => {
                        self.fail("Upload", e);
                        self.upload_status = UploadStatus::Failed;
                        None
                    }
                }
            }
        }
    }

    fn issue(&mut self, request: Request) -> Option<Request> {
        if request.is_network() {
            self.in_flight += 1;
        }
        Some(request)
    }

    /// Release one unit of loading; called first by every result handler
    fn settle(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    fn next_listing(&mut self, directory: String) -> Option<Request> {
        self.listing_generation += 1;
        let generation = self.listing_generation;
        self.issue(Request::ListFiles {
            directory,
            generation,
        })
    }

    fn fail(&mut self, operation: &str, error: String) {
        warn!("⚠️  {} failed: {}", operation, error);
        self.error = Some(format!("{} failed: {}", operation, error));
    }

    fn reject(&mut self, error: ValidationError) {
        self.error = Some(error.to_string());
    }

    fn reset_picker(&mut self) {
        self.picked_path = None;
        self.selected_file = None;
    }

    pub fn directories(&self) -> &[String] {
        &self.directories
    }

    pub fn selected_directory(&self) -> Option<&str> {
        self.selected_directory.as_deref()
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn new_directory_name(&self) -> &str {
        &self.new_directory_name
    }

    pub fn picked_path(&self) -> Option<&Path> {
        self.picked_path.as_deref()
    }

    pub fn selected_file(&self) -> Option<&LocalFile> {
        self.selected_file.as_ref()
    }

    pub fn upload_status(&self) -> UploadStatus {
        self.upload_status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    /// Upload button is enabled only when idle with both selections made
    pub fn can_upload(&self) -> bool {
        !self.is_loading() && self.selected_file.is_some() && self.selected_directory.is_some()
    }
}

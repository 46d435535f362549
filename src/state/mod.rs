/// State management module
///
/// This module handles all application state, including:
/// - Status types and local validation errors (data.rs)
/// - The view controller and its messages (controller.rs)
/// - Running controller requests against the backend (effects.rs)

pub mod controller;
pub mod data;
pub mod effects;

pub use controller::{Message, Request, ViewState};
pub use data::UploadStatus;

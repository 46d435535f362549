use iced::{Element, Task, Theme};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod state;
mod ui;

use api::{ApiClient, FileBackend, StaticToken};
use config::Config;
use state::{Message, ViewState};

/// Main application state
struct DirUploader {
    /// Directory list, selections and status shown in the window
    view: ViewState,
    /// Backend every request is sent to
    backend: Arc<dyn FileBackend>,
}

impl DirUploader {
    /// Create the application and kick off the initial directory listing
    fn new(backend: Arc<dyn FileBackend>, max_upload_bytes: u64) -> (Self, Task<Message>) {
        let mut app = DirUploader {
            view: ViewState::new(max_upload_bytes),
            backend,
        };
        let task = app.update(Message::LoadDirectories);
        (app, task)
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match self.view.update(message) {
            Some(request) => Task::perform(
                state::effects::perform(self.backend.clone(), request),
                |message| message,
            ),
            None => Task::none(),
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        ui::view(&self.view)
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> iced::Result {
    init_tracing();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("❌ Configuration error: {}", e);
            if let Some(path) = Config::config_file_path() {
                error!("   Config file location: {}", path.display());
            }
            std::process::exit(2);
        }
    };

    let credentials = Arc::new(StaticToken::new(&config.api_token));
    let client = match ApiClient::new(&config, credentials) {
        Ok(client) => client,
        Err(e) => {
            error!("❌ Could not create HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    info!("🌐 Directory Uploader using backend {}", client.base_url());

    let backend: Arc<dyn FileBackend> = Arc::new(client);
    let max_upload_bytes = config.max_upload_bytes;

    iced::application(
        "Directory Uploader",
        DirUploader::update,
        DirUploader::view,
    )
    .theme(DirUploader::theme)
    .centered()
    .run_with(move || DirUploader::new(backend, max_upload_bytes))
}

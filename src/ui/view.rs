use iced::widget::{button, column, container, row, scrollable, text, text_input, Column};
use iced::{Alignment, Color, Element, Length};

use crate::api::LocalFile;
use crate::state::{Message, UploadStatus, ViewState};

const ERROR_COLOR: Color = Color::from_rgb(0.95, 0.40, 0.40);
const SUCCESS_COLOR: Color = Color::from_rgb(0.45, 0.85, 0.50);
const WARNING_COLOR: Color = Color::from_rgb(0.95, 0.75, 0.30);
const MUTED_COLOR: Color = Color::from_rgb(0.6, 0.6, 0.6);

/// Build the whole window
pub fn view(state: &ViewState) -> Element<'_, Message> {
    let content = Column::new()
        .spacing(20)
        .padding(30)
        .max_width(900)
        .push(text("Directory Uploader - File Management").size(32))
        .push_maybe(state.error().map(|error| text(error).color(ERROR_COLOR)))
        .push(directories_section(state))
        .push(upload_section(state))
        .push_maybe(
            state
                .selected_directory()
                .map(|directory| files_section(state, directory)),
        );

    container(scrollable(content))
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .into()
}

fn section<'a>(title: String, body: Element<'a, Message>) -> Element<'a, Message> {
    container(column![text(title).size(22), body].spacing(12))
        .padding(16)
        .width(Length::Fill)
        .style(container::rounded_box)
        .into()
}

fn directories_section(state: &ViewState) -> Element<'_, Message> {
    let idle = !state.is_loading();

    let controls = row![
        text_input("New directory name", state.new_directory_name())
            .on_input(Message::NewDirectoryNameChanged)
            .on_submit(Message::CreateDirectory)
            .padding(8),
        button("Create Directory")
            .on_press_maybe(idle.then_some(Message::CreateDirectory))
            .style(button::primary)
            .padding(8),
        button("Refresh")
            .on_press_maybe(idle.then_some(Message::LoadDirectories))
            .style(button::secondary)
            .padding(8),
    ]
    .spacing(10)
    .align_y(Alignment::Center);

    let list: Element<'_, Message> = match directories_placeholder(state) {
        Some(placeholder) => text(placeholder).color(MUTED_COLOR).into(),
        None => {
            let items = state.directories().iter().map(|directory| {
                let selected = state.selected_directory() == Some(directory.as_str());
                let item: Element<'_, Message> = button(text(format!("📁 {}", directory)))
                    .width(Length::Fill)
                    .style(if selected { button::primary } else { button::text })
                    .on_press(Message::SelectDirectory(directory.clone()))
                    .into();
                item
            });
            scrollable(Column::with_children(items).spacing(4))
                .height(Length::Fixed(220.0))
                .into()
        }
    };

    section(
        "Directories".to_string(),
        column![controls, list].spacing(12).into(),
    )
}

fn upload_section(state: &ViewState) -> Element<'_, Message> {
    let picker_label = state
        .picked_path()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "No file chosen".to_string());

    let controls = row![
        button("Choose File")
            .on_press(Message::PickFile)
            .style(button::secondary)
            .padding(8),
        text(picker_label).size(14).color(MUTED_COLOR),
        button("Upload File")
            .on_press_maybe(state.can_upload().then_some(Message::Upload))
            .style(button::primary)
            .padding(8),
    ]
    .spacing(10)
    .align_y(Alignment::Center);

    let status = state.upload_status();
    let status_color = match status {
        UploadStatus::Succeeded => SUCCESS_COLOR,
        UploadStatus::Failed => ERROR_COLOR,
        _ => MUTED_COLOR,
    };

    let body = Column::new()
        .spacing(8)
        .push(controls)
        .push_maybe(state.selected_file().map(|file| text(selected_file_label(file)).size(14)))
        .push_maybe((status != UploadStatus::Idle).then(|| text(status.to_string()).color(status_color)))
        .push_maybe(
            state
                .selected_directory()
                .is_none()
                .then(|| text("Please select a directory first").color(WARNING_COLOR)),
        );

    section("File Upload".to_string(), body.into())
}

fn files_section<'a>(state: &'a ViewState, directory: &'a str) -> Element<'a, Message> {
    let body: Element<'a, Message> = match files_placeholder(state) {
        Some(placeholder) => text(placeholder).color(MUTED_COLOR).into(),
        None => Column::with_children(state.files().iter().map(|file| {
            let item: Element<'a, Message> = text(format!("📄 {}", file)).into();
            item
        }))
        .spacing(4)
        .into(),
    };

    section(format!("Files in \"{}\"", directory), body)
}

/// Shown instead of the directory list while the first listing is loading
pub fn directories_placeholder(state: &ViewState) -> Option<&'static str> {
    (state.is_loading() && state.directories().is_empty()).then_some("Loading directories...")
}

/// Shown instead of an empty file list
pub fn files_placeholder(state: &ViewState) -> Option<&'static str> {
    if !state.files().is_empty() {
        None
    } else if state.is_loading() {
        Some("Loading files...")
    } else {
        Some("No files in this directory")
    }
}

pub fn selected_file_label(file: &LocalFile) -> String {
    format!("Selected: {} ({}KB)", file.name, file.size_kb())
}

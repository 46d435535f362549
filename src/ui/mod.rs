/// User interface module
///
/// Pure functions from `&ViewState` to iced widgets. No state lives here.

pub mod view;

pub use view::view;

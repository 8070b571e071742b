//! Panels render from the session view and report what the user asked for;
//! the app layer turns each action into a controller call.

pub mod studio;
pub mod history;
pub mod confirm;
pub mod settings;

use studio_types::image::AppMode;

/// A user intent produced by a panel this frame
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    SetMode(AppMode),
    PickFile,
    ClearUpload,
    Submit(String),
    Inspire,
    DismissError,
    DismissWarning,
    /// Show a library image as the current result
    View(String),
    UseForEditing(String),
    Download { image_uri: String, file_name: String },
    RequestClearHistory,
    /// Answer to the pending confirmation
    Confirm(bool),
}

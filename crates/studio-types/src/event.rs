use serde::{Deserialize, Serialize};

use crate::image::AppMode;

/// Events emitted by the session controller.
/// UI drains these each frame for repaint and notices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StudioEvent {
    /// A generate/edit call started
    SubmitStarted { mode: AppMode },

    /// The result image is ready to display
    ImageReady { image_uri: String },

    /// The cycle failed; message is user-facing
    SubmitFailed { message: String },

    /// Displayed history was replaced (optimistic or confirmed)
    HistoryChanged { len: usize, confirmed: bool },

    /// Non-fatal: the image is shown but was not kept in the library
    LibraryWarning { message: String },

    /// An inspirational prompt is available
    InspirationReady { prompt: String },

    ModeChanged { mode: AppMode },

    UploadStaged { preview_uri: String },

    HistoryCleared,

    /// Presentation layer should bring the form back into view
    ScrollToTop,
}

//! UI-level state that drives rendering.
//! Session data itself lives in the controller's view; this holds what only
//! the presentation cares about, updated each frame by draining the EventBus.

use studio_types::event::StudioEvent;
use studio_types::image::AppMode;

/// State visible to UI panels
pub struct UiState {
    /// Prompt field content
    pub prompt_text: String,
    /// Whether settings panel is open
    pub show_settings: bool,
    /// Status line text
    pub status_text: String,
    /// Set when the form should be scrolled back into view
    pub scroll_to_top: bool,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            prompt_text: String::new(),
            show_settings: false,
            status_text: "Ready".to_string(),
            scroll_to_top: false,
        }
    }

    /// Process events from the EventBus and update UI state
    pub fn process_events(&mut self, events: Vec<StudioEvent>) {
        for event in events {
            match event {
                StudioEvent::SubmitStarted { mode } => {
                    self.status_text = match mode {
                        AppMode::Generate => "Generating...".to_string(),
                        AppMode::Edit => "Editing...".to_string(),
                    };
                }
                StudioEvent::ImageReady { .. } => {
                    self.status_text = "Image ready".to_string();
                }
                StudioEvent::SubmitFailed { message } => {
                    self.status_text = format!("Error: {}", message);
                }
                StudioEvent::HistoryChanged { len, confirmed } => {
                    self.status_text = if confirmed {
                        format!("Library: {} saved", len)
                    } else {
                        "Saving to library...".to_string()
                    };
                }
                StudioEvent::LibraryWarning { message } => {
                    self.status_text = message;
                }
                StudioEvent::InspirationReady { prompt } => {
                    self.prompt_text = prompt;
                }
                StudioEvent::ModeChanged { mode } => {
                    self.prompt_text.clear();
                    self.status_text = format!("{} mode", mode.label());
                }
                StudioEvent::UploadStaged { .. } => {
                    self.status_text = "Image ready to edit".to_string();
                }
                StudioEvent::HistoryCleared => {
                    self.status_text = "Library cleared".to_string();
                }
                StudioEvent::ScrollToTop => {
                    self.scroll_to_top = true;
                }
            }
        }
    }

    /// Consume a pending scroll request.
    pub fn take_scroll_to_top(&mut self) -> bool {
        std::mem::take(&mut self.scroll_to_top)
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

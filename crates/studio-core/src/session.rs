//! Session controller: orchestrates generate / edit cycles.
//!
//! One cycle: Idle → Submitting → {Success, Failed}. The next user action
//! (mode switch, reuse-for-editing, another submit) starts from there.
//!
//! History is updated in two phases. The optimistic candidate is shown as
//! soon as the image arrives; persistence runs on the next event-loop turn
//! and its accepted list then replaces the optimistic one.
//!
//! All state lives behind RefCell and no borrow is held across an await, so
//! the UI may read the view while a cycle is in flight.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use studio_types::{
    event::StudioEvent,
    history::HistoryRecord,
    image::{AppMode, FileBlob, UploadedImage},
    Result, StudioError,
};

use crate::client::GenerationClient;
use crate::codec;
use crate::event_bus::EventBus;
use crate::history::HistoryStore;
use crate::ports::{DelayPort, InspirationPort};

pub const LIBRARY_TOO_LARGE: &str =
    "Image generated, but it was too large to save to your library. It is available for this session only.";
pub const LIBRARY_WRITE_FAILED: &str =
    "Image generated, but it could not be saved to your library. It is available for this session only.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitPhase {
    Idle,
    Submitting,
    Success,
    Failed(String),
}

/// Destructive actions waiting on the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    ClearHistory,
}

/// Everything the presentation layer renders.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView {
    pub mode: AppMode,
    pub phase: SubmitPhase,
    pub inspiring: bool,
    pub result_uri: Option<String>,
    pub error: Option<String>,
    pub warning: Option<String>,
    pub upload: Option<UploadedImage>,
    pub history: Vec<HistoryRecord>,
    pub pending_confirmation: Option<Confirmation>,
}

impl Default for SessionView {
    fn default() -> Self {
        Self {
            mode: AppMode::Generate,
            phase: SubmitPhase::Idle,
            inspiring: false,
            result_uri: None,
            error: None,
            warning: None,
            upload: None,
            history: Vec::new(),
            pending_confirmation: None,
        }
    }
}

impl SessionView {
    pub fn is_busy(&self) -> bool {
        self.phase == SubmitPhase::Submitting
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A cycle was already in flight
    Ignored,
    Completed { record_id: String, saved: bool },
}

pub struct SessionController {
    client: RefCell<Rc<GenerationClient>>,
    history: RefCell<HistoryStore>,
    delay: Rc<dyn DelayPort>,
    inspiration: RefCell<Option<Rc<dyn InspirationPort>>>,
    event_bus: EventBus,
    view: RefCell<SessionView>,
    /// Bumped when the user moves away from the current result
    epoch: Cell<u64>,
}

impl SessionController {
    pub fn new(
        client: Rc<GenerationClient>,
        history: HistoryStore,
        delay: Rc<dyn DelayPort>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            client: RefCell::new(client),
            history: RefCell::new(history),
            delay,
            inspiration: RefCell::new(None),
            event_bus,
            view: RefCell::new(SessionView::default()),
            epoch: Cell::new(0),
        }
    }

    pub fn with_inspiration(self, inspiration: Rc<dyn InspirationPort>) -> Self {
        self.replace_inspiration(inspiration);
        self
    }

    pub fn replace_inspiration(&self, inspiration: Rc<dyn InspirationPort>) {
        *self.inspiration.borrow_mut() = Some(inspiration);
    }

    /// Load the persisted history. Called once at session start.
    pub fn start(&self) {
        let records = self.history.borrow_mut().load();
        let len = records.len();
        self.view.borrow_mut().history = records;
        self.event_bus
            .emit(StudioEvent::HistoryChanged { len, confirmed: true });
    }

    /// Swap the generation client (settings changed). In-flight calls keep
    /// the client they started with.
    pub fn replace_client(&self, client: Rc<GenerationClient>) {
        *self.client.borrow_mut() = client;
    }

    /// Swap the history backend and reload from it.
    pub fn replace_history(&self, history: HistoryStore) {
        *self.history.borrow_mut() = history;
        self.start();
    }

    pub fn view(&self) -> SessionView {
        self.view.borrow().clone()
    }

    /// Borrow the view without cloning image data.
    pub fn with_view<R>(&self, f: impl FnOnce(&SessionView) -> R) -> R {
        f(&self.view.borrow())
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    // ─── Mode & staging ──────────────────────────────────────

    pub fn set_mode(&self, mode: AppMode) {
        self.bump_epoch();
        {
            let mut view = self.view.borrow_mut();
            view.mode = mode;
            view.error = None;
            view.warning = None;
            view.result_uri = None;
            view.upload = None;
            if view.phase != SubmitPhase::Submitting {
                view.phase = SubmitPhase::Idle;
            }
        }
        self.event_bus.emit(StudioEvent::ModeChanged { mode });
    }

    /// Stage a source image for editing. Ignored outside edit mode, e.g. a
    /// file pick that resolves after the user switched back to generate.
    pub fn stage_upload(&self, upload: UploadedImage) {
        let preview_uri = upload.preview_uri.clone();
        {
            let mut view = self.view.borrow_mut();
            if view.mode != AppMode::Edit {
                log::debug!("Dropping upload staged in {} mode", view.mode.label());
                return;
            }
            view.upload = Some(upload);
            view.error = None;
        }
        self.event_bus.emit(StudioEvent::UploadStaged { preview_uri });
    }

    /// Decode a file and stage it. A format error is surfaced and aborts
    /// only this action.
    pub fn stage_file(&self, file: &FileBlob) -> Result<()> {
        match codec::decode_file(file) {
            Ok(upload) => {
                self.stage_upload(upload);
                Ok(())
            }
            Err(e) => {
                log::warn!("Rejected upload {}: {}", file.name, e);
                self.show_error("Failed to process image file. Please try another one.");
                Err(e)
            }
        }
    }

    pub fn clear_upload(&self) {
        self.view.borrow_mut().upload = None;
    }

    /// Show an existing image (history "view") in the result area.
    pub fn show_image(&self, image_uri: &str) {
        self.view.borrow_mut().result_uri = Some(image_uri.to_string());
        self.event_bus.emit(StudioEvent::ImageReady {
            image_uri: image_uri.to_string(),
        });
    }

    /// Stage a previous result for editing and switch to Edit mode.
    pub fn use_for_editing(&self, image_uri: &str) -> Result<()> {
        let upload = match codec::decode_data_uri(image_uri) {
            Ok(upload) => upload,
            Err(e) => {
                log::warn!("Cannot reuse image for editing: {}", e);
                self.show_error(&e.to_string());
                return Err(e);
            }
        };
        self.bump_epoch();
        let preview_uri = upload.preview_uri.clone();
        {
            let mut view = self.view.borrow_mut();
            view.mode = AppMode::Edit;
            view.upload = Some(upload);
            view.result_uri = None;
            view.error = None;
            view.warning = None;
            if view.phase != SubmitPhase::Submitting {
                view.phase = SubmitPhase::Idle;
            }
        }
        self.event_bus.emit(StudioEvent::ModeChanged { mode: AppMode::Edit });
        self.event_bus.emit(StudioEvent::UploadStaged { preview_uri });
        self.event_bus.emit(StudioEvent::ScrollToTop);
        Ok(())
    }

    pub fn dismiss_error(&self) {
        self.view.borrow_mut().error = None;
    }

    pub fn dismiss_warning(&self) {
        self.view.borrow_mut().warning = None;
    }

    // ─── Submit cycle ────────────────────────────────────────

    /// Run one generate/edit cycle with the current mode and staged upload.
    ///
    /// Returns `Ignored` when a cycle is already in flight. Validation and
    /// generation errors are also recorded in the view.
    pub async fn submit(&self, prompt: &str) -> Result<SubmitOutcome> {
        if self.view.borrow().is_busy() {
            log::debug!("Submit ignored: a request is already in flight");
            return Ok(SubmitOutcome::Ignored);
        }

        let (mode, upload) = {
            let view = self.view.borrow();
            (view.mode, view.upload.clone())
        };

        if prompt.trim().is_empty() {
            return Err(self.reject("Please enter a prompt."));
        }
        let source = match (mode, upload) {
            (AppMode::Edit, None) => return Err(self.reject("Please upload an image to edit.")),
            (AppMode::Edit, Some(upload)) => Some(upload.payload),
            (AppMode::Generate, _) => None,
        };

        let epoch = self.epoch.get();
        {
            let mut view = self.view.borrow_mut();
            view.phase = SubmitPhase::Submitting;
            view.error = None;
            view.warning = None;
            view.result_uri = None;
        }
        self.event_bus.emit(StudioEvent::SubmitStarted { mode });

        let client = self.client.borrow().clone();
        let result = match &source {
            Some(source) => client.edit(prompt, source).await,
            None => client.generate(prompt).await,
        };

        let payload = match result {
            Ok(payload) => payload,
            Err(e) => {
                let message = e.to_string();
                {
                    let mut view = self.view.borrow_mut();
                    view.phase = SubmitPhase::Failed(message.clone());
                    view.error = Some(message.clone());
                }
                self.event_bus.emit(StudioEvent::SubmitFailed { message });
                return Err(e);
            }
        };

        let image_uri = codec::encode(&payload);
        if self.epoch.get() == epoch {
            self.view.borrow_mut().result_uri = Some(image_uri.clone());
            self.event_bus.emit(StudioEvent::ImageReady {
                image_uri: image_uri.clone(),
            });
        } else {
            log::info!("Result arrived after the session moved on; saving to history only");
        }

        let record = HistoryRecord::new(image_uri, prompt.to_string());
        let record_id = record.id.clone();

        // Phase one: optimistic candidate.
        let optimistic = self.history.borrow().stage(&record);
        let len = optimistic.len();
        self.view.borrow_mut().history = optimistic;
        self.event_bus
            .emit(StudioEvent::HistoryChanged { len, confirmed: false });

        // Let the optimistic state render before writing.
        self.delay.sleep(0).await;

        // Phase two: persist, then reconcile with what was accepted.
        let saved = self.persist(record);
        self.view.borrow_mut().phase = SubmitPhase::Success;
        Ok(SubmitOutcome::Completed { record_id, saved })
    }

    /// Append to the store and replace the displayed history with the
    /// accepted sequence. Returns whether the record was kept.
    fn persist(&self, record: HistoryRecord) -> bool {
        let record_id = record.id.clone();
        let outcome = self.history.borrow_mut().append(record);
        let saved = outcome.contains(&record_id);
        let warning = match (&outcome.error, saved) {
            (_, true) => None,
            (Some(e), false) if !e.is_capacity() => Some(LIBRARY_WRITE_FAILED),
            _ => Some(LIBRARY_TOO_LARGE),
        };

        let len = outcome.accepted.len();
        {
            let mut view = self.view.borrow_mut();
            if view.history.len() != len {
                log::info!(
                    "Reconciling history: {} shown, {} persisted",
                    view.history.len(),
                    len
                );
            }
            view.history = outcome.accepted;
            view.warning = warning.map(str::to_string);
        }
        self.event_bus
            .emit(StudioEvent::HistoryChanged { len, confirmed: true });
        if let Some(message) = warning {
            self.event_bus.emit(StudioEvent::LibraryWarning {
                message: message.to_string(),
            });
        }
        saved
    }

    // ─── Inspiration ─────────────────────────────────────────

    /// Ask for a prompt idea. Only in Generate mode; a call while one is
    /// running is ignored.
    pub async fn inspire(&self) -> Option<String> {
        let inspiration = self.inspiration.borrow().clone()?;
        {
            let mut view = self.view.borrow_mut();
            if view.inspiring || view.mode != AppMode::Generate {
                return None;
            }
            view.inspiring = true;
            view.error = None;
        }

        let result = inspiration.inspire().await;
        self.view.borrow_mut().inspiring = false;

        match result {
            Ok(prompt) => {
                self.event_bus.emit(StudioEvent::InspirationReady {
                    prompt: prompt.clone(),
                });
                Some(prompt)
            }
            Err(e) => {
                log::warn!("Inspiration failed: {}", e);
                self.show_error("Could not come up with a prompt right now. Please try again.");
                None
            }
        }
    }

    // ─── Clear history ───────────────────────────────────────

    /// Ask for confirmation before clearing. No-op when history is empty.
    pub fn request_clear_history(&self) {
        let mut view = self.view.borrow_mut();
        if !view.history.is_empty() {
            view.pending_confirmation = Some(Confirmation::ClearHistory);
        }
    }

    /// Resolve the pending confirmation. Clears history only when accepted.
    pub fn resolve_confirmation(&self, accepted: bool) -> Result<()> {
        let pending = self.view.borrow_mut().pending_confirmation.take();
        match pending {
            Some(Confirmation::ClearHistory) if accepted => self.clear_history(),
            _ => Ok(()),
        }
    }

    fn clear_history(&self) -> Result<()> {
        let result = self.history.borrow_mut().clear();
        self.view.borrow_mut().history.clear();
        self.event_bus.emit(StudioEvent::HistoryCleared);
        if let Err(e) = &result {
            log::error!("Failed to clear durable history: {}", e);
        } else {
            log::info!("History cleared");
        }
        result
    }

    // ─── Helpers ─────────────────────────────────────────────

    fn bump_epoch(&self) {
        self.epoch.set(self.epoch.get() + 1);
    }

    fn show_error(&self, message: &str) {
        self.view.borrow_mut().error = Some(message.to_string());
        self.event_bus.emit(StudioEvent::SubmitFailed {
            message: message.to_string(),
        });
    }

    fn reject(&self, message: &str) -> StudioError {
        self.show_error(message);
        StudioError::Validation(message.to_string())
    }
}

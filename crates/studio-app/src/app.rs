//! Main egui application — composes all panels and drives the session.

use std::rc::Rc;

use egui::{self, CentralPanel, RichText, ScrollArea, SidePanel, TopBottomPanel};

use studio_core::client::{GenerationClient, ModelFactory};
use studio_core::event_bus::EventBus;
use studio_core::history::HistoryStore;
use studio_core::inspire::FallbackInspiration;
use studio_core::ports::{DelayPort, ImageModelPort, InspirationPort, StoragePort};
use studio_core::retry::RetryPolicy;
use studio_core::session::{SessionController, SubmitOutcome};
use studio_platform::storage::open_storage;
use studio_platform::{download, file, inspire, GeminiProvider, TimerDelay};
use studio_types::config::{StorageBackendType, StudioConfig};
use studio_types::image::{AppMode, FileBlob};
use studio_ui::images::ImageCache;
use studio_ui::panels::settings::{self, SaveFeedback, SettingsAction};
use studio_ui::panels::{confirm, history, studio, UiAction};
use studio_ui::state::UiState;
use studio_ui::theme;

const CONFIG_STORAGE_KEY: &str = "studio:config";

/// The main application state
pub struct StudioApp {
    ui_state: UiState,
    /// Settings as edited in the panel
    config: StudioConfig,
    /// Settings the session was last built from
    applied: StudioConfig,
    event_bus: EventBus,
    session: Rc<SessionController>,
    /// Where settings live; independent of the library backend
    config_storage: Rc<dyn StoragePort>,
    delay: Rc<dyn DelayPort>,
    images: ImageCache,
    save_feedback: Option<SaveFeedback>,
    first_frame: bool,
}

impl StudioApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        egui_extras::install_image_loaders(&cc.egui_ctx);

        let config_storage = open_storage(StorageBackendType::Auto);
        let config = Self::restore_config(config_storage.as_ref());

        let delay: Rc<dyn DelayPort> = Rc::new(TimerDelay);
        let event_bus = EventBus::new();
        let library = open_storage(config.history.backend);

        let session = SessionController::new(
            Self::build_client(&config, delay.clone()),
            HistoryStore::from_config(library, &config.history),
            delay.clone(),
            event_bus.clone(),
        )
        .with_inspiration(Self::build_inspiration(&config));
        session.start();

        Self {
            ui_state: UiState::new(),
            applied: config.clone(),
            config,
            event_bus,
            session: Rc::new(session),
            config_storage,
            delay,
            images: ImageCache::new(),
            save_feedback: None,
            first_frame: true,
        }
    }

    /// Restore config from storage, falling back to defaults.
    fn restore_config(storage: &dyn StoragePort) -> StudioConfig {
        match storage.get(CONFIG_STORAGE_KEY) {
            Ok(Some(data)) => match serde_json::from_str::<StudioConfig>(&data) {
                Ok(config) => {
                    log::info!("Config restored from storage");
                    config
                }
                Err(e) => {
                    log::warn!("Ignoring unreadable config: {}", e);
                    StudioConfig::default()
                }
            },
            Ok(None) => StudioConfig::default(),
            Err(e) => {
                log::warn!("Config unavailable ({}), using defaults", e);
                StudioConfig::default()
            }
        }
    }

    fn save_config(storage: &dyn StoragePort, config: &StudioConfig) -> SaveFeedback {
        let result = serde_json::to_string(config)
            .map_err(|e| e.to_string())
            .and_then(|json| {
                storage
                    .set(CONFIG_STORAGE_KEY, &json)
                    .map_err(|e| e.to_string())
            });
        match result {
            Ok(()) => {
                log::info!("Config saved to storage");
                SaveFeedback {
                    message: "Saved".to_string(),
                    success: true,
                }
            }
            Err(e) => {
                log::error!("Failed to save config: {}", e);
                SaveFeedback {
                    message: format!("Save failed: {}", e),
                    success: false,
                }
            }
        }
    }

    /// The Gemini connection is only built when the first request needs it.
    fn build_client(config: &StudioConfig, delay: Rc<dyn DelayPort>) -> Rc<GenerationClient> {
        let model_config = config.model.clone();
        let factory: ModelFactory = Box::new(move || {
            let provider = GeminiProvider::new(model_config.clone())?;
            Ok(Rc::new(provider) as Rc<dyn ImageModelPort>)
        });
        Rc::new(GenerationClient::new(
            factory,
            RetryPolicy::from(config.retry),
            delay,
        ))
    }

    /// Remote inspiration when a key is configured, templates otherwise.
    fn build_inspiration(config: &StudioConfig) -> Rc<dyn InspirationPort> {
        let template: Rc<dyn InspirationPort> = Rc::new(inspire::template_inspiration());
        match GeminiProvider::new(config.model.clone()) {
            Ok(provider) => Rc::new(FallbackInspiration::new(Rc::new(provider), template)),
            Err(_) => template,
        }
    }

    /// Persist settings and rebuild whatever they feed.
    fn apply_settings(&mut self) {
        self.save_feedback = Some(Self::save_config(
            self.config_storage.as_ref(),
            &self.config,
        ));

        if self.config.model != self.applied.model || self.config.retry != self.applied.retry {
            self.session
                .replace_client(Self::build_client(&self.config, self.delay.clone()));
            self.session
                .replace_inspiration(Self::build_inspiration(&self.config));
            log::info!("Model settings applied: {}", self.config.model.image_model);
        }

        if self.config.history != self.applied.history {
            let library = open_storage(self.config.history.backend);
            self.session
                .replace_history(HistoryStore::from_config(library, &self.config.history));
            log::info!("Library settings applied");
        }

        self.applied = self.config.clone();
    }
}

impl eframe::App for StudioApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.first_frame {
            theme::apply_theme(ctx);
            self.first_frame = false;
        }

        // Drain events from the session
        let events = self.event_bus.drain();
        if !events.is_empty() {
            self.ui_state.process_events(events);
            ctx.request_repaint();
        }

        let (busy, inspiring) = self.session.with_view(|v| (v.is_busy(), v.inspiring));
        if busy || inspiring {
            ctx.request_repaint();
        }

        self.handle_dropped_files(ctx, busy);

        // ── Top bar ──────────────────────────────────────────
        TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new("Image Studio")
                        .strong()
                        .color(theme::ACCENT)
                        .size(16.0),
                );
                ui.separator();
                ui.label(
                    RichText::new(format!(
                        "Model: {} | Library: {}",
                        self.applied.model.image_model,
                        self.applied.history.backend.label()
                    ))
                    .color(theme::TEXT_SECONDARY)
                    .small(),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .add(egui::Button::selectable(self.ui_state.show_settings, "Settings"))
                        .clicked()
                    {
                        self.ui_state.show_settings = !self.ui_state.show_settings;
                    }
                });
            });
        });

        // ── Status bar ───────────────────────────────────────
        TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.label(
                RichText::new(&self.ui_state.status_text)
                    .color(theme::TEXT_SECONDARY)
                    .small(),
            );
        });

        // ── Settings side panel ──────────────────────────────
        if self.ui_state.show_settings {
            let feedback = self.save_feedback.clone();
            let action = SidePanel::right("settings_panel")
                .min_width(280.0)
                .max_width(350.0)
                .show(ctx, |ui| {
                    ScrollArea::vertical()
                        .show(ui, |ui| {
                            settings::settings_panel(ui, &mut self.config, feedback.as_ref())
                        })
                        .inner
                })
                .inner;
            match action {
                SettingsAction::SaveClicked => self.apply_settings(),
                SettingsAction::Changed => self.save_feedback = None,
                SettingsAction::None => {}
            }
        }

        // ── Main content ─────────────────────────────────────
        let mut actions = Vec::new();
        let session = self.session.clone();
        session.with_view(|view| {
            CentralPanel::default().show(ctx, |ui| {
                let mut scroll = ScrollArea::vertical().auto_shrink([false, false]);
                if self.ui_state.take_scroll_to_top() {
                    scroll = scroll.vertical_scroll_offset(0.0);
                }
                scroll.show(ui, |ui| {
                    actions.extend(studio::studio_panel(
                        ui,
                        &mut self.ui_state,
                        view,
                        &mut self.images,
                    ));
                    ui.add_space(16.0);
                    actions.extend(history::history_panel(ui, view, &mut self.images));
                });
            });

            if let Some(confirmation) = &view.pending_confirmation {
                if let Some(answer) = confirm::confirm_dialog(ctx, confirmation) {
                    actions.push(UiAction::Confirm(answer));
                }
            }

            let live = view
                .history
                .iter()
                .map(|r| r.image_uri.as_str())
                .chain(view.result_uri.as_deref())
                .chain(view.upload.as_ref().map(|u| u.preview_uri.as_str()));
            self.images.retain(ctx, live);
        });

        if ctx.input(|i| !i.raw.hovered_files.is_empty()) {
            egui::Area::new(egui::Id::new("drop_hint"))
                .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
                .show(ctx, |ui| {
                    ui.label(
                        RichText::new("Drop an image to edit it")
                            .color(theme::TEXT_PRIMARY)
                            .size(20.0),
                    );
                });
        }

        // Handled outside the view borrow: actions mutate the session.
        for action in actions {
            self.handle_action(action, ctx);
        }
    }
}

impl StudioApp {
    fn handle_action(&mut self, action: UiAction, ctx: &egui::Context) {
        match action {
            UiAction::SetMode(mode) => self.session.set_mode(mode),
            UiAction::PickFile => self.dispatch_pick_file(ctx),
            UiAction::ClearUpload => self.session.clear_upload(),
            UiAction::Submit(prompt) => self.dispatch_submit(prompt, ctx),
            UiAction::Inspire => self.dispatch_inspire(ctx),
            UiAction::DismissError => self.session.dismiss_error(),
            UiAction::DismissWarning => self.session.dismiss_warning(),
            UiAction::View(image_uri) => {
                self.session.show_image(&image_uri);
                self.ui_state.scroll_to_top = true;
            }
            UiAction::UseForEditing(image_uri) => {
                // Failures are surfaced in the view by the controller
                let _ = self.session.use_for_editing(&image_uri);
            }
            UiAction::Download {
                image_uri,
                file_name,
            } => {
                if let Err(e) = download::trigger_download(&image_uri, &file_name) {
                    log::error!("Download failed: {}", e);
                }
            }
            UiAction::RequestClearHistory => self.session.request_clear_history(),
            UiAction::Confirm(accepted) => {
                if let Err(e) = self.session.resolve_confirmation(accepted) {
                    log::error!("Clearing the library failed: {}", e);
                }
            }
        }
        ctx.request_repaint();
    }

    /// Run one generate/edit cycle (async)
    fn dispatch_submit(&self, prompt: String, ctx: &egui::Context) {
        let session = self.session.clone();
        let ctx = ctx.clone();

        wasm_bindgen_futures::spawn_local(async move {
            match session.submit(&prompt).await {
                Ok(SubmitOutcome::Completed { record_id, saved }) => {
                    log::info!("Submit completed: {} (saved: {})", record_id, saved);
                }
                Ok(SubmitOutcome::Ignored) => log::debug!("Submit ignored, one is in flight"),
                Err(e) => log::warn!("Submit failed: {}", e),
            }
            ctx.request_repaint();
        });
    }

    fn dispatch_inspire(&self, ctx: &egui::Context) {
        let session = self.session.clone();
        let ctx = ctx.clone();

        wasm_bindgen_futures::spawn_local(async move {
            session.inspire().await;
            ctx.request_repaint();
        });
    }

    /// Open the native file chooser and stage the chosen image (async)
    fn dispatch_pick_file(&self, ctx: &egui::Context) {
        let session = self.session.clone();
        let ctx = ctx.clone();

        wasm_bindgen_futures::spawn_local(async move {
            match file::pick_image_file().await {
                Ok(Some(blob)) => {
                    let _ = session.stage_file(&blob);
                }
                Ok(None) => log::debug!("File selection cancelled"),
                Err(e) => log::error!("File picker failed: {}", e),
            }
            ctx.request_repaint();
        });
    }

    /// Dropping an image anywhere switches to Edit and stages it.
    fn handle_dropped_files(&mut self, ctx: &egui::Context, busy: bool) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let Some(dropped) = dropped.into_iter().find(|f| f.bytes.is_some()) else {
            return;
        };
        if busy {
            log::debug!("Ignoring dropped file while a request is running");
            return;
        }
        let Some(bytes) = dropped.bytes else {
            return;
        };
        let blob = FileBlob {
            name: dropped.name,
            mime_type: dropped.mime,
            bytes: bytes.to_vec(),
        };
        if self.session.with_view(|v| v.mode) != AppMode::Edit {
            self.session.set_mode(AppMode::Edit);
        }
        let _ = self.session.stage_file(&blob);
        ctx.request_repaint();
    }
}

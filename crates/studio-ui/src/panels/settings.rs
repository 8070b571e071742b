//! Settings panel: model access, library storage and retry behaviour,
//! with an explicit Save button and visual feedback.

use egui::{self, RichText, Vec2};
use studio_types::config::{StorageBackendType, StudioConfig, DEFAULT_API_BASE};
use studio_core::retry::MIN_ATTEMPTS;
use crate::theme::*;

/// What the caller should do after rendering the settings panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsAction {
    /// Nothing changed
    None,
    /// A field was changed
    Changed,
    /// The user clicked the explicit Save button
    SaveClicked,
}

/// Save feedback passed in from the app layer
#[derive(Clone)]
pub struct SaveFeedback {
    pub message: String,
    pub success: bool,
}

/// Render the settings panel. Returns an action for the caller to handle.
pub fn settings_panel(
    ui: &mut egui::Ui,
    config: &mut StudioConfig,
    save_feedback: Option<&SaveFeedback>,
) -> SettingsAction {
    let mut changed = false;
    let mut save_clicked = false;

    egui::Frame::default()
        .fill(BG_SECONDARY)
        .inner_margin(PANEL_PADDING)
        .corner_radius(PANEL_ROUNDING)
        .show(ui, |ui| {
            ui.heading(RichText::new("Settings").color(TEXT_PRIMARY));
            ui.separator();

            // ── Model Section ────────────────────────────────
            ui.label(RichText::new("Model").color(ACCENT).strong());
            ui.add_space(2.0);

            ui.label(RichText::new("API Key").color(TEXT_SECONDARY).small());
            let api_key_edit = egui::TextEdit::singleline(&mut config.model.api_key)
                .password(true)
                .hint_text("AIza...");
            changed |= ui.add(api_key_edit).changed();

            ui.add_space(4.0);

            ui.label(RichText::new("API Base URL (optional)").color(TEXT_SECONDARY).small());
            let mut base_url = config.model.api_base.clone().unwrap_or_default();
            if ui
                .add(egui::TextEdit::singleline(&mut base_url).hint_text(DEFAULT_API_BASE))
                .changed()
            {
                config.model.api_base = if base_url.trim().is_empty() {
                    None
                } else {
                    Some(base_url)
                };
                changed = true;
            }

            ui.add_space(4.0);

            ui.label(RichText::new("Image model").color(TEXT_SECONDARY).small());
            changed |= ui.text_edit_singleline(&mut config.model.image_model).changed();

            ui.label(RichText::new("Inspiration model").color(TEXT_SECONDARY).small());
            changed |= ui.text_edit_singleline(&mut config.model.text_model).changed();

            ui.add_space(12.0);
            ui.separator();
            ui.add_space(4.0);

            // ── Library Section ──────────────────────────────
            ui.label(RichText::new("Library").color(ACCENT).strong());
            ui.add_space(2.0);

            ui.label(RichText::new("Images kept").color(TEXT_SECONDARY).small());
            changed |= ui
                .add(egui::Slider::new(&mut config.history.max_items, 1..=50))
                .changed();

            ui.label(RichText::new("Backend").color(TEXT_SECONDARY).small());
            egui::ComboBox::from_id_salt("storage_backend")
                .selected_text(config.history.backend.label())
                .show_ui(ui, |ui| {
                    for backend in StorageBackendType::all() {
                        changed |= ui
                            .selectable_value(&mut config.history.backend, *backend, backend.label())
                            .changed();
                    }
                });

            ui.add_space(4.0);
            ui.label(
                RichText::new(storage_description(&config.history.backend))
                    .color(TEXT_SECONDARY)
                    .small()
                    .italics(),
            );

            ui.add_space(12.0);
            ui.separator();
            ui.add_space(4.0);

            // ── Retry Section ────────────────────────────────
            ui.label(RichText::new("Retries").color(ACCENT).strong());
            ui.add_space(2.0);

            ui.label(RichText::new("Attempts per request").color(TEXT_SECONDARY).small());
            changed |= ui
                .add(egui::Slider::new(&mut config.retry.max_attempts, MIN_ATTEMPTS..=5))
                .changed();

            ui.label(RichText::new("First backoff (ms)").color(TEXT_SECONDARY).small());
            changed |= ui
                .add(egui::Slider::new(&mut config.retry.base_delay_ms, 50..=2000))
                .changed();

            // ── Save Button ──────────────────────────────────
            ui.add_space(16.0);
            ui.separator();
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                let btn = ui.add(
                    egui::Button::new(
                        RichText::new("Save Settings")
                            .color(TEXT_PRIMARY)
                            .strong(),
                    )
                    .fill(ACCENT)
                    .corner_radius(PANEL_ROUNDING)
                    .min_size(Vec2::new(120.0, 28.0)),
                );
                if btn.clicked() {
                    save_clicked = true;
                }

                if let Some(fb) = save_feedback {
                    let color = if fb.success { SUCCESS } else { ERROR };
                    ui.label(RichText::new(&fb.message).color(color).small());
                }
            });
        });

    if save_clicked {
        SettingsAction::SaveClicked
    } else if changed {
        SettingsAction::Changed
    } else {
        SettingsAction::None
    }
}

pub fn storage_description(backend: &StorageBackendType) -> &'static str {
    match backend {
        StorageBackendType::Auto => "Uses localStorage when the browser allows it, otherwise Memory.",
        StorageBackendType::Memory => "Fast but volatile. The library is lost on page reload.",
        StorageBackendType::LocalStorage => "Persistent browser storage, limited to a few megabytes. Older images are dropped to make room.",
    }
}

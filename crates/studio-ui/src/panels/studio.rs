//! Studio panel: mode switch, upload, prompt, submit and the current result.

use egui::{self, RichText, Vec2};
use studio_core::session::{SessionView, SubmitPhase};
use studio_types::image::{extension_for_mime, AppMode};

use super::UiAction;
use crate::images::ImageCache;
use crate::state::UiState;
use crate::theme::*;

/// Render the studio panel. Returns at most one action per frame.
pub fn studio_panel(
    ui: &mut egui::Ui,
    state: &mut UiState,
    view: &SessionView,
    images: &mut ImageCache,
) -> Option<UiAction> {
    let mut action = None;
    let busy = view.is_busy();

    // ── Mode ─────────────────────────────────────────────────
    ui.horizontal(|ui| {
        for mode in AppMode::all() {
            let selected = view.mode == *mode;
            let label = ui.add_enabled(
                !busy,
                egui::Button::selectable(selected, RichText::new(mode.label()).strong()),
            );
            if label.clicked() && !selected {
                action = Some(UiAction::SetMode(*mode));
            }
        }
    });
    ui.add_space(6.0);

    // ── Upload (edit only) ──────────────────────────────────
    if view.mode == AppMode::Edit {
        egui::Frame::default()
            .fill(BG_SECONDARY)
            .inner_margin(PANEL_PADDING)
            .corner_radius(PANEL_ROUNDING)
            .show(ui, |ui| match &view.upload {
                Some(upload) => {
                    ui.horizontal(|ui| {
                        if let Some(image) = images.image(&upload.preview_uri) {
                            ui.add(image.max_size(Vec2::splat(THUMBNAIL_SIZE)));
                        }
                        ui.vertical(|ui| {
                            ui.label(RichText::new("Image to edit").color(TEXT_SECONDARY).small());
                            if ui.add_enabled(!busy, egui::Button::new("Replace")).clicked() {
                                action = Some(UiAction::PickFile);
                            }
                            if ui.add_enabled(!busy, egui::Button::new("Remove")).clicked() {
                                action = Some(UiAction::ClearUpload);
                            }
                        });
                    });
                }
                None => {
                    ui.vertical_centered(|ui| {
                        if ui
                            .add_enabled(!busy, egui::Button::new("Choose an image..."))
                            .clicked()
                        {
                            action = Some(UiAction::PickFile);
                        }
                        ui.label(
                            RichText::new("or drop an image anywhere on the page")
                                .color(TEXT_SECONDARY)
                                .small(),
                        );
                    });
                }
            });
        ui.add_space(6.0);
    }

    // ── Prompt ───────────────────────────────────────────────
    let hint = match view.mode {
        AppMode::Generate => "Describe the image you want to create...",
        AppMode::Edit => "Describe how the image should change...",
    };
    ui.add_enabled(
        !busy,
        egui::TextEdit::multiline(&mut state.prompt_text)
            .hint_text(hint)
            .desired_rows(3)
            .desired_width(f32::INFINITY),
    );
    ui.add_space(4.0);

    ui.horizontal(|ui| {
        let submit_label = match (view.mode, &view.phase) {
            (_, SubmitPhase::Submitting) => "Working...",
            (AppMode::Generate, _) => "Generate",
            (AppMode::Edit, _) => "Apply edit",
        };
        let submit = ui.add_enabled(
            !busy,
            egui::Button::new(RichText::new(submit_label).color(TEXT_PRIMARY).strong())
                .fill(ACCENT)
                .corner_radius(PANEL_ROUNDING)
                .min_size(Vec2::new(120.0, 30.0)),
        );
        if submit.clicked() {
            action = Some(UiAction::Submit(state.prompt_text.clone()));
        }

        if view.mode == AppMode::Generate {
            let inspire = ui.add_enabled(
                !busy && !view.inspiring,
                egui::Button::new(if view.inspiring { "Thinking..." } else { "Inspire me" }),
            );
            if inspire.clicked() {
                action = Some(UiAction::Inspire);
            }
        }

        if busy {
            ui.spinner();
        }
    });

    // ── Notices ──────────────────────────────────────────────
    if let Some(error) = &view.error {
        if notice(ui, error, ERROR) {
            action = Some(UiAction::DismissError);
        }
    }
    if let Some(warning) = &view.warning {
        if notice(ui, warning, WARNING) {
            action = Some(UiAction::DismissWarning);
        }
    }

    // ── Result ───────────────────────────────────────────────
    if let Some(result_uri) = &view.result_uri {
        ui.add_space(10.0);
        egui::Frame::default()
            .fill(BG_CANVAS)
            .inner_margin(PANEL_PADDING)
            .corner_radius(PANEL_ROUNDING)
            .show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    match images.image(result_uri) {
                        Some(image) => {
                            ui.add(image.max_size(Vec2::splat(RESULT_MAX_SIZE)));
                        }
                        None => {
                            ui.label(RichText::new("This image cannot be displayed.").color(ERROR));
                        }
                    }
                    ui.horizontal(|ui| {
                        if ui.button("Download").clicked() {
                            action = Some(UiAction::Download {
                                image_uri: result_uri.clone(),
                                file_name: result_file_name(view, result_uri),
                            });
                        }
                        if ui
                            .add_enabled(!busy, egui::Button::new("Edit this image"))
                            .clicked()
                        {
                            action = Some(UiAction::UseForEditing(result_uri.clone()));
                        }
                    });
                });
            });
    }

    action
}

/// Download name for the displayed result: the library record's name when
/// it was kept, a generic one otherwise.
pub fn result_file_name(view: &SessionView, result_uri: &str) -> String {
    match view.history.iter().find(|r| r.image_uri == result_uri) {
        Some(record) => record.download_file_name(),
        None => {
            let mime = result_uri
                .strip_prefix("data:")
                .and_then(|rest| rest.split(';').next())
                .unwrap_or_default();
            format!("image-studio-result.{}", extension_for_mime(mime))
        }
    }
}

/// Banner with a dismiss button. Returns true when dismissed.
fn notice(ui: &mut egui::Ui, text: &str, color: egui::Color32) -> bool {
    let mut dismissed = false;
    ui.add_space(6.0);
    egui::Frame::default()
        .fill(color.linear_multiply(0.15))
        .stroke(egui::Stroke::new(1.0, color))
        .inner_margin(PANEL_PADDING)
        .corner_radius(PANEL_ROUNDING)
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new(text).color(color));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    dismissed = ui.small_button("✕").clicked();
                });
            });
        });
    dismissed
}

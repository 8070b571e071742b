//! Library panel: grid of saved images with view, re-edit and download.

use egui::{self, RichText, Sense, Vec2};
use studio_core::session::SessionView;

use super::UiAction;
use crate::images::ImageCache;
use crate::theme::*;

const PROMPT_PREVIEW_CHARS: usize = 60;

pub fn history_panel(
    ui: &mut egui::Ui,
    view: &SessionView,
    images: &mut ImageCache,
) -> Option<UiAction> {
    let mut action = None;
    let busy = view.is_busy();

    ui.horizontal(|ui| {
        ui.heading(RichText::new(format!("Library ({})", view.history.len())).color(TEXT_PRIMARY));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui
                .add_enabled(!view.history.is_empty() && !busy, egui::Button::new("Clear all"))
                .clicked()
            {
                action = Some(UiAction::RequestClearHistory);
            }
        });
    });
    ui.separator();

    if view.history.is_empty() {
        ui.label(
            RichText::new("Your creations will appear here.")
                .color(TEXT_SECONDARY)
                .italics(),
        );
        return action;
    }

    ui.horizontal_wrapped(|ui| {
        for record in &view.history {
            egui::Frame::default()
                .fill(BG_SECONDARY)
                .inner_margin(6.0)
                .corner_radius(PANEL_ROUNDING)
                .show(ui, |ui| {
                    ui.set_width(THUMBNAIL_SIZE);
                    ui.vertical(|ui| {
                        let thumb = match images.image(&record.image_uri) {
                            Some(image) => ui.add(
                                image
                                    .fit_to_exact_size(Vec2::splat(THUMBNAIL_SIZE))
                                    .sense(Sense::click()),
                            ),
                            None => ui.add_sized(
                                Vec2::splat(THUMBNAIL_SIZE),
                                egui::Label::new(RichText::new("?").color(TEXT_SECONDARY)),
                            ),
                        };
                        if thumb.on_hover_text(&record.prompt).clicked() {
                            action = Some(UiAction::View(record.image_uri.clone()));
                        }

                        ui.label(
                            RichText::new(truncate(&record.prompt, PROMPT_PREVIEW_CHARS))
                                .color(TEXT_PRIMARY)
                                .small(),
                        );
                        ui.label(
                            RichText::new(record.created_at_label())
                                .color(TEXT_SECONDARY)
                                .small(),
                        );
                        ui.horizontal(|ui| {
                            if ui
                                .add_enabled(!busy, egui::Button::new("Edit").small())
                                .clicked()
                            {
                                action = Some(UiAction::UseForEditing(record.image_uri.clone()));
                            }
                            if ui.small_button("Download").clicked() {
                                action = Some(UiAction::Download {
                                    image_uri: record.image_uri.clone(),
                                    file_name: record.download_file_name(),
                                });
                            }
                        });
                    });
                });
        }
    });

    action
}

pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{}…", head.trim_end())
    }
}

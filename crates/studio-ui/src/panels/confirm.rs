use egui::{self, RichText};
use studio_core::session::Confirmation;

use crate::theme::*;

/// Modal for a pending confirmation. Returns `Some(answer)` once chosen.
pub fn confirm_dialog(ctx: &egui::Context, confirmation: &Confirmation) -> Option<bool> {
    let (title, body, accept) = match confirmation {
        Confirmation::ClearHistory => (
            "Clear library?",
            "This permanently removes every saved image from this browser.",
            "Clear all",
        ),
    };

    let mut answer = None;
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            ui.label(RichText::new(body).color(TEXT_PRIMARY));
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui
                    .add(egui::Button::new(RichText::new(accept).color(TEXT_PRIMARY)).fill(ERROR))
                    .clicked()
                {
                    answer = Some(true);
                }
                if ui.button("Cancel").clicked() {
                    answer = Some(false);
                }
            });
        });
    answer
}

//! UI theme constants

use egui::{Color32, CornerRadius, Stroke, Vec2};

pub const BG_PRIMARY: Color32 = Color32::from_rgb(17, 24, 39);
pub const BG_SECONDARY: Color32 = Color32::from_rgb(31, 41, 55);
pub const BG_SURFACE: Color32 = Color32::from_rgb(55, 65, 81);
pub const BG_CANVAS: Color32 = Color32::from_rgb(10, 14, 24);
pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(243, 244, 246);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(156, 163, 175);
pub const ACCENT: Color32 = Color32::from_rgb(139, 92, 246);
pub const ACCENT_ALT: Color32 = Color32::from_rgb(236, 72, 153);
pub const SUCCESS: Color32 = Color32::from_rgb(34, 197, 94);
pub const ERROR: Color32 = Color32::from_rgb(239, 68, 68);
pub const WARNING: Color32 = Color32::from_rgb(234, 179, 8);

pub const PANEL_ROUNDING: CornerRadius = CornerRadius::same(8);
pub const PANEL_PADDING: Vec2 = Vec2::new(12.0, 10.0);
pub const THUMBNAIL_SIZE: f32 = 140.0;
pub const RESULT_MAX_SIZE: f32 = 512.0;

/// Apply the dark theme to an egui context
pub fn apply_theme(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();

    style.visuals.dark_mode = true;
    style.visuals.panel_fill = BG_PRIMARY;
    style.visuals.window_fill = BG_SECONDARY;
    style.visuals.extreme_bg_color = BG_CANVAS;

    style.visuals.widgets.inactive.bg_fill = BG_SURFACE;
    style.visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, TEXT_SECONDARY);
    style.visuals.widgets.hovered.bg_fill = ACCENT.linear_multiply(0.35);
    style.visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, TEXT_PRIMARY);
    style.visuals.widgets.active.bg_fill = ACCENT;
    style.visuals.widgets.active.fg_stroke = Stroke::new(1.0, TEXT_PRIMARY);

    style.visuals.selection.bg_fill = ACCENT.linear_multiply(0.4);
    style.visuals.selection.stroke = Stroke::new(1.0, ACCENT);

    style.visuals.window_corner_radius = PANEL_ROUNDING;
    style.visuals.hyperlink_color = ACCENT_ALT;

    style.spacing.item_spacing = Vec2::new(8.0, 8.0);
    style.spacing.button_padding = Vec2::new(10.0, 5.0);

    ctx.set_style(style);
}

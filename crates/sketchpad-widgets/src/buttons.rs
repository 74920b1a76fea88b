//! Toolbar buttons.

use egui::{
    Align2, Color32, CornerRadius, CursorIcon, FontId, Pos2, Rect, Sense, Stroke, StrokeKind, Ui,
    vec2,
};

use crate::{sizing, theme};

/// A full-width text button for the side toolbar.
///
/// Optionally shows a color swatch on the right (used by "Choose Color" to
/// preview the brush) and a shortcut hint in its tooltip.
pub struct ToolbarButton<'a> {
    label: &'a str,
    shortcut: Option<&'a str>,
    swatch: Option<Color32>,
    active: bool,
}

impl<'a> ToolbarButton<'a> {
    pub fn new(label: &'a str) -> Self {
        Self {
            label,
            shortcut: None,
            swatch: None,
            active: false,
        }
    }

    /// Add a shortcut hint (shown in hover tooltip).
    pub fn shortcut(mut self, shortcut: &'a str) -> Self {
        self.shortcut = Some(shortcut);
        self
    }

    /// Show a color swatch next to the label.
    pub fn swatch(mut self, color: Color32) -> Self {
        self.swatch = Some(color);
        self
    }

    /// Highlight the button (e.g. eraser in use).
    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Show the button and return true if clicked.
    pub fn show(self, ui: &mut Ui) -> bool {
        let size = vec2(ui.available_width(), sizing::BUTTON_HEIGHT);
        let (rect, response) = ui.allocate_exact_size(size, Sense::click());

        if ui.is_rect_visible(rect) {
            let radius = CornerRadius::same(sizing::CORNER_RADIUS);
            let (bg_color, text_color) = if self.active {
                (theme::ACCENT, Color32::WHITE)
            } else if response.hovered() {
                (theme::HOVER_BG, theme::TEXT)
            } else {
                (theme::BUTTON_BG, theme::TEXT)
            };

            ui.painter().rect_filled(rect, radius, bg_color);
            if !self.active {
                ui.painter().rect_stroke(
                    rect,
                    radius,
                    Stroke::new(1.0, theme::BORDER),
                    StrokeKind::Inside,
                );
            }

            ui.painter().text(
                Pos2::new(rect.left() + 10.0, rect.center().y),
                Align2::LEFT_CENTER,
                self.label,
                FontId::proportional(13.0),
                text_color,
            );

            if let Some(color) = self.swatch {
                let swatch = Rect::from_center_size(
                    Pos2::new(rect.right() - 8.0 - sizing::SWATCH / 2.0, rect.center().y),
                    vec2(sizing::SWATCH, sizing::SWATCH),
                );
                ui.painter().rect_filled(swatch, CornerRadius::same(2), color);
                ui.painter().rect_stroke(
                    swatch,
                    CornerRadius::same(2),
                    Stroke::new(1.0, Color32::from_gray(160)),
                    StrokeKind::Outside,
                );
            }
        }

        let clicked = response.clicked();
        let response = response.on_hover_cursor(CursorIcon::PointingHand);
        if let Some(shortcut) = self.shortcut {
            response.on_hover_text(format!("{} ({})", self.label, shortcut));
        }
        clicked
    }
}

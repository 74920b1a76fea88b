//! Panel frames.

use egui::{Color32, CornerRadius, Frame, Margin, Stroke};

use crate::{sizing, theme};

/// Frame for the side toolbar: flat fill, right border, roomy padding.
pub fn toolbar_frame() -> Frame {
    Frame::new()
        .fill(theme::PANEL_BG)
        .corner_radius(CornerRadius::same(0))
        .stroke(Stroke::new(1.0, theme::BORDER))
        .shadow(egui::epaint::Shadow {
            spread: 0,
            blur: 6,
            offset: [1, 0],
            color: Color32::from_black_alpha(10),
        })
        .inner_margin(Margin::same(sizing::PANEL_RADIUS as i8 + 2))
}

//! Layout helpers: headings, separators, section labels, tip lists.

use egui::{Color32, FontId, Pos2, RichText, Stroke, Ui};

use crate::theme;

/// Draw a toolbar heading (bold, regular text color).
pub fn heading(ui: &mut Ui, text: &str) {
    ui.label(
        RichText::new(text)
            .font(FontId::proportional(16.0))
            .strong()
            .color(theme::TEXT),
    );
    ui.add_space(4.0);
}

/// Draw a section label (small, muted text).
pub fn section_label(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).size(11.0).color(theme::TEXT_MUTED));
}

/// Draw a horizontal separator line.
pub fn separator(ui: &mut Ui) {
    ui.add_space(4.0);
    let rect = ui.available_rect_before_wrap();
    let y = rect.top();
    ui.painter().line_segment(
        [Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)],
        Stroke::new(1.0, Color32::from_gray(225)),
    );
    ui.add_space(6.0);
}

/// Draw a titled list of short hints, one per line.
pub fn tip_list(ui: &mut Ui, title: &str, tips: &[&str]) {
    section_label(ui, title);
    for tip in tips {
        ui.label(
            RichText::new(format!("- {}", tip))
                .size(11.0)
                .color(theme::TEXT),
        );
    }
}

//! Styled egui helpers for the SketchPad toolbar.
//!
//! - **Buttons**: full-width toolbar buttons with optional color swatch
//! - **Layout**: headings, section labels, separators, tip lists
//! - **Panel**: the toolbar frame

pub mod buttons;
pub mod layout;
pub mod panel;

pub use buttons::ToolbarButton;
pub use layout::{heading, section_label, separator, tip_list};
pub use panel::toolbar_frame;

/// Standard sizing constants used across widgets.
pub mod sizing {
    /// Toolbar panel width
    pub const TOOLBAR_WIDTH: f32 = 140.0;
    /// Toolbar button height
    pub const BUTTON_HEIGHT: f32 = 28.0;
    /// Color swatch edge inside a button
    pub const SWATCH: f32 = 14.0;
    /// Standard corner radius
    pub const CORNER_RADIUS: u8 = 4;
    /// Panel corner radius
    pub const PANEL_RADIUS: u8 = 8;
}

/// Standard colors used across widgets.
pub mod theme {
    use egui::Color32;

    /// Text color (dark gray)
    pub const TEXT: Color32 = Color32::from_rgb(60, 60, 60);
    /// Muted text color
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(120, 120, 120);
    /// Border color
    pub const BORDER: Color32 = Color32::from_rgb(220, 220, 220);
    /// Active button color (blue)
    pub const ACCENT: Color32 = Color32::from_rgb(59, 130, 246);
    /// Hover background
    pub const HOVER_BG: Color32 = Color32::from_rgb(240, 240, 240);
    /// Idle button background
    pub const BUTTON_BG: Color32 = Color32::from_rgb(250, 250, 250);
    /// Panel background
    pub const PANEL_BG: Color32 = Color32::from_rgb(246, 246, 248);
}

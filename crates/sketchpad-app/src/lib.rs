//! SketchPad Application
//!
//! The desktop shell: window, toolbar, drawing area, keyboard shortcuts
//! and native dialogs around the core canvas.

mod app;
mod shortcuts;
mod ui;

pub use app::{DragSample, SketchpadApp, pointer_events, to_canvas_point};
pub use shortcuts::{Shortcut, ShortcutRegistry};
pub use ui::{UiAction, UiState, render_ui};

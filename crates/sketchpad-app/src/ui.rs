//! Toolbar UI built with egui.

use egui::{Color32, Context, Vec2};
use sketchpad_core::{BrushState, MAX_BRUSH_SIZE, MIN_BRUSH_SIZE, SerializableColor};
use sketchpad_widgets::{ToolbarButton, heading, section_label, separator, sizing, tip_list, toolbar_frame};

/// Actions the UI asks the application to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    /// Set the brush color picked in the color dialog.
    ChooseColor(SerializableColor),
    /// Paint with the background color.
    UseEraser,
    /// Remove every stroke.
    Clear,
    /// Remove the most recent stroke.
    Undo,
    /// Change brush size (clamped by the canvas).
    SetBrushSize(u32),
    /// Run the save pipeline.
    Save,
}

/// Transient widget state that outlives a single frame.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Slider value, synced from the brush each frame.
    pub brush_size: u32,
    /// Color being edited while the picker window is open.
    pub color_picker: Option<Color32>,
}

impl UiState {
    pub fn new(brush: &BrushState) -> Self {
        Self {
            brush_size: brush.size(),
            color_picker: None,
        }
    }
}

const TIPS: &[&str] = &[
    "Hold mouse and draw",
    "Ctrl+Z undo",
    "Ctrl+S save",
    "Use Eraser to erase",
];

pub fn to_color32(color: SerializableColor) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

pub fn from_color32(color: Color32) -> SerializableColor {
    let [r, g, b, _] = color.to_srgba_unmultiplied();
    SerializableColor::rgb(r, g, b)
}

/// Render all UI and return the first triggered action.
pub fn render_ui(ctx: &Context, ui_state: &mut UiState, brush: &BrushState) -> Option<UiAction> {
    ui_state.brush_size = brush.size();

    let toolbar_action = render_toolbar(ctx, ui_state, brush);
    let picker_action = render_color_picker(ctx, ui_state);

    toolbar_action.or(picker_action)
}

fn render_toolbar(ctx: &Context, ui_state: &mut UiState, brush: &BrushState) -> Option<UiAction> {
    let mut action = None;
    let erasing = brush.color() == brush.background();

    egui::SidePanel::left("toolbar")
        .resizable(false)
        .exact_width(sizing::TOOLBAR_WIDTH)
        .frame(toolbar_frame())
        .show(ctx, |ui| {
            ui.spacing_mut().item_spacing = Vec2::new(0.0, 6.0);

            heading(ui, "Brush");

            if ToolbarButton::new("Choose Color")
                .swatch(to_color32(brush.color()))
                .show(ui)
            {
                ui_state.color_picker = Some(to_color32(brush.color()));
            }
            if ToolbarButton::new("Eraser").active(erasing).show(ui) {
                action = Some(UiAction::UseEraser);
            }
            if ToolbarButton::new("Clear").show(ui) {
                action = Some(UiAction::Clear);
            }
            if ToolbarButton::new("Undo (Ctrl+Z)").shortcut("Ctrl+Z").show(ui) {
                action = Some(UiAction::Undo);
            }

            separator(ui);
            section_label(ui, "Brush size");
            let slider = egui::Slider::new(&mut ui_state.brush_size, MIN_BRUSH_SIZE..=MAX_BRUSH_SIZE)
                .show_value(true);
            if ui.add(slider).changed() {
                action = Some(UiAction::SetBrushSize(ui_state.brush_size));
            }

            separator(ui);
            if ToolbarButton::new("Save (Ctrl+S)").shortcut("Ctrl+S").show(ui) {
                action = Some(UiAction::Save);
            }

            ui.add_space(18.0);
            tip_list(ui, "Tips", TIPS);
        });

    action
}

/// Color dialog seeded with the current brush color. Cancel leaves the brush unchanged.
fn render_color_picker(ctx: &Context, ui_state: &mut UiState) -> Option<UiAction> {
    let mut color = ui_state.color_picker?;
    let mut action = None;
    let mut close = false;

    egui::Window::new("Pick brush color")
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            egui::color_picker::color_picker_color32(ui, &mut color, egui::color_picker::Alpha::Opaque);
            ui.horizontal(|ui| {
                if ui.button("OK").clicked() {
                    action = Some(UiAction::ChooseColor(from_color32(color)));
                    close = true;
                }
                if ui.button("Cancel").clicked() {
                    close = true;
                }
            });
        });

    ui_state.color_picker = if close { None } else { Some(color) };
    action
}

//! Main application state and eframe integration.

use egui::{CursorIcon, Pos2, Rect, Sense, Shape};
use kurbo::{PathEl, Point};
use sketchpad_core::{
    AppConfig, Canvas, FileChooser, Notice, PointerEvent, RasterConverter, Stroke, save_drawing,
};
use sketchpad_render::detect_converter;

use crate::shortcuts::ShortcutRegistry;
use crate::ui::{UiAction, UiState, render_ui, to_color32};

/// Curve flattening tolerance for on-screen strokes, in logical pixels.
const SCREEN_TOLERANCE: f64 = 0.25;

/// File and message dialogs (native).
#[cfg(feature = "native")]
mod file_ops {
    use sketchpad_core::{FileChooser, Notice, NoticeLevel};
    use std::path::PathBuf;

    /// Native save dialog offering PNG and PostScript.
    pub struct DialogChooser;

    impl FileChooser for DialogChooser {
        fn choose_save_path(&self) -> Option<PathBuf> {
            rfd::FileDialog::new()
                .set_title("Save your masterpiece")
                .set_file_name("untitled.png")
                .add_filter("PNG Image", &["png"])
                .add_filter("PostScript", &["ps"])
                .save_file()
        }
    }

    /// Show a notice as a blocking message box.
    pub fn show_notice(notice: &Notice) {
        let level = match notice.level {
            NoticeLevel::Info => rfd::MessageLevel::Info,
            NoticeLevel::Error => rfd::MessageLevel::Error,
        };
        rfd::MessageDialog::new()
            .set_level(level)
            .set_title(notice.title.as_str())
            .set_description(notice.message.as_str())
            .set_buttons(rfd::MessageButtons::Ok)
            .show();
    }
}

/// Headless stand-ins: saving is unavailable and notices go to the log.
#[cfg(not(feature = "native"))]
mod file_ops {
    use sketchpad_core::{FileChooser, Notice, NoticeLevel};
    use std::path::PathBuf;

    pub struct DialogChooser;

    impl FileChooser for DialogChooser {
        fn choose_save_path(&self) -> Option<PathBuf> {
            log::warn!("Save dialog requires the `native` feature");
            None
        }
    }

    pub fn show_notice(notice: &Notice) {
        match notice.level {
            NoticeLevel::Info => log::info!("{}", notice),
            NoticeLevel::Error => log::error!("{}", notice),
        }
    }
}

/// One frame's worth of drag information from the drawing area.
#[derive(Debug, Clone, Copy, Default)]
pub struct DragSample {
    pub started: bool,
    pub dragged: bool,
    pub stopped: bool,
    /// Where the button went down (screen coordinates).
    pub press_origin: Option<Pos2>,
    /// Current pointer position (screen coordinates).
    pub position: Option<Pos2>,
}

/// Convert a screen position to drawing-surface coordinates.
pub fn to_canvas_point(pos: Pos2, origin: Pos2) -> Point {
    Point::new((pos.x - origin.x) as f64, (pos.y - origin.y) as f64)
}

/// Translate an egui drag sample into pointer events for the canvas.
///
/// egui reports a drag only after the pointer has moved, so the press
/// origin becomes the `Down` position and the current position the first `Move`.
pub fn pointer_events(sample: DragSample, origin: Pos2) -> Vec<PointerEvent> {
    let mut events = Vec::new();
    let position = sample.position.map(|p| to_canvas_point(p, origin));

    if sample.started {
        if let Some(down) = sample.press_origin.or(sample.position) {
            events.push(PointerEvent::Down {
                position: to_canvas_point(down, origin),
            });
        }
    }
    if sample.started || sample.dragged {
        if let Some(position) = position {
            events.push(PointerEvent::Move { position });
        }
    }
    if sample.stopped {
        events.push(PointerEvent::Up {
            position: position.unwrap_or_default(),
        });
    }
    events
}

/// The SketchPad application.
pub struct SketchpadApp {
    canvas: Canvas,
    ui_state: UiState,
    converter: Option<Box<dyn RasterConverter>>,
}

impl SketchpadApp {
    /// Create the app and detect the raster converter once.
    pub fn new(config: &AppConfig) -> Self {
        let converter = detect_converter(&config.raster);
        Self::with_converter(config, converter)
    }

    pub fn with_converter(config: &AppConfig, converter: Option<Box<dyn RasterConverter>>) -> Self {
        let brush = config.brush();
        Self {
            canvas: Canvas::with_brush(brush),
            ui_state: UiState::new(&brush),
            converter,
        }
    }

    /// Open the window and run the event loop until it closes.
    pub fn run(config: AppConfig) -> eframe::Result<()> {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_title(config.title.as_str())
                .with_inner_size([config.width as f32, config.height as f32])
                .with_min_inner_size([400.0, 300.0]),
            ..Default::default()
        };
        let title = config.title.clone();
        eframe::run_native(
            &title,
            options,
            Box::new(move |_cc| Ok(Box::new(SketchpadApp::new(&config)))),
        )
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Apply a UI action. Returns a notice to show the user, if any.
    pub fn apply_action(&mut self, action: UiAction, chooser: &dyn FileChooser) -> Option<Notice> {
        match action {
            UiAction::ChooseColor(color) => {
                self.canvas.choose_color(color);
                None
            }
            UiAction::UseEraser => {
                self.canvas.use_eraser();
                None
            }
            UiAction::Clear => {
                self.canvas.clear();
                None
            }
            UiAction::Undo => self.canvas.undo(),
            UiAction::SetBrushSize(size) => {
                self.ui_state.brush_size = self.canvas.set_brush_size(size);
                None
            }
            UiAction::Save => self.save(chooser),
        }
    }

    fn save(&self, chooser: &dyn FileChooser) -> Option<Notice> {
        let page = self.canvas.vector_page();
        match save_drawing(&page, chooser, self.converter.as_deref()) {
            Ok(outcome) => outcome.map(|outcome| outcome.notice()),
            Err(e) => {
                log::error!("{}", e);
                Some(e.notice())
            }
        }
    }

    fn handle_ui_action(&mut self, action: UiAction) {
        if let Some(notice) = self.apply_action(action, &file_ops::DialogChooser) {
            file_ops::show_notice(&notice);
        }
    }

    fn render_canvas(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::drag());
                self.canvas
                    .set_viewport_size(rect.width() as f64, rect.height() as f64);

                let painter = ui.painter_at(rect);
                painter.rect_filled(rect, 0.0, to_color32(self.canvas.brush.background()));

                let sample = DragSample {
                    started: response.drag_started(),
                    dragged: response.dragged(),
                    stopped: response.drag_stopped(),
                    press_origin: ctx.input(|i| i.pointer.press_origin()),
                    position: response.interact_pointer_pos(),
                };
                for event in pointer_events(sample, rect.min) {
                    self.canvas.handle_pointer_event(event);
                }

                for stroke in self.canvas.surface.strokes_ordered() {
                    paint_stroke(&painter, rect, stroke);
                }

                response.on_hover_cursor(CursorIcon::Crosshair);
            });
    }
}

/// Paint a stroke as a smoothed polyline with round caps.
fn paint_stroke(painter: &egui::Painter, rect: Rect, stroke: &Stroke) {
    painter.extend(stroke_shapes(rect, stroke));
}

/// Screen shapes for one stroke: the flattened polyline, plus a filled circle
/// at each end when the line is wide enough for the cap to show.
fn stroke_shapes(rect: Rect, stroke: &Stroke) -> Vec<Shape> {
    let color = to_color32(stroke.style.color);
    let width = stroke.style.width as f32;
    let to_screen = |p: Point| Pos2::new(rect.min.x + p.x as f32, rect.min.y + p.y as f32);

    let mut points = Vec::new();
    kurbo::flatten(stroke.to_path(), SCREEN_TOLERANCE, |el| match el {
        PathEl::MoveTo(p) | PathEl::LineTo(p) => points.push(to_screen(p)),
        _ => {}
    });

    let mut shapes = Vec::with_capacity(3);
    let ends = points.first().copied().zip(points.last().copied());
    if points.len() >= 2 {
        shapes.push(Shape::line(points, egui::Stroke::new(width, color)));
    }
    if let Some((start, end)) = ends.filter(|_| width > 2.0) {
        shapes.push(Shape::circle_filled(start, width / 2.0, color));
        shapes.push(Shape::circle_filled(end, width / 2.0, color));
    }
    shapes
}

impl eframe::App for SketchpadApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let shortcut_action = ShortcutRegistry::consume(ctx);
        let ui_action = render_ui(ctx, &mut self.ui_state, &self.canvas.brush);
        self.render_canvas(ctx);

        for action in [shortcut_action, ui_action].into_iter().flatten() {
            self.handle_ui_action(action);
        }
    }
}

//! SketchPad Core Library
//!
//! GUI-free data structures and logic for the SketchPad drawing pad:
//! strokes, the drawing surface with its undo stack, brush and pointer
//! state, and the save pipeline with PostScript fallback.

pub mod brush;
pub mod canvas;
pub mod config;
pub mod export;
pub mod input;
pub mod notice;
pub mod shapes;

pub use brush::{BrushState, DEFAULT_BRUSH_SIZE, MAX_BRUSH_SIZE, MIN_BRUSH_SIZE};
pub use canvas::{Canvas, DrawingSurface, UndoOutcome};
pub use config::{AppConfig, ConfigError, RasterBackend, RasterConfig};
pub use export::{
    ExportError, ExportFormat, FallbackReason, FileChooser, RasterConverter, SaveOutcome,
    save_drawing,
};
pub use input::{PointerEvent, PointerState};
pub use notice::{Notice, NoticeLevel};
pub use shapes::{CapStyle, Segment, SerializableColor, Stroke, StrokeId, StrokeStyle};

//! Drawing surface and canvas state management.

use crate::brush::BrushState;
use crate::export::{VectorPage, VectorStroke};
use crate::input::{PointerEvent, PointerState};
use crate::notice::Notice;
use crate::shapes::{SerializableColor, Segment, Stroke, StrokeId, StrokeStyle};
use kurbo::{Rect, Size};
use std::collections::HashMap;

/// Page size used until the UI reports the real drawing area.
pub const DEFAULT_SURFACE_SIZE: Size = Size::new(760.0, 600.0);

/// Result of an undo request.
#[derive(Debug, Clone)]
pub enum UndoOutcome {
    /// The most recent stroke was removed.
    Removed(Stroke),
    /// The undo stack was empty; nothing changed.
    NothingToUndo,
}

/// The strokes drawn so far and the undo stack over them.
///
/// The undo stack lists every stroke on the surface in creation order, so it
/// doubles as the paint order (back to front).
#[derive(Debug, Clone)]
pub struct DrawingSurface {
    strokes: HashMap<StrokeId, Stroke>,
    undo_stack: Vec<StrokeId>,
    size: Size,
}

impl Default for DrawingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawingSurface {
    /// Create a new empty surface.
    pub fn new() -> Self {
        Self {
            strokes: HashMap::new(),
            undo_stack: Vec::new(),
            size: DEFAULT_SURFACE_SIZE,
        }
    }

    /// Create a stroke from its first segment and register it for undo.
    pub fn begin_stroke(&mut self, style: StrokeStyle, first: Segment) -> StrokeId {
        let mut stroke = Stroke::new(style);
        stroke.push_segment(first);
        let id = stroke.id();
        log::debug!(
            "Stroke {} started ({}, width {})",
            id,
            style.color,
            style.width
        );
        self.strokes.insert(id, stroke);
        self.undo_stack.push(id);
        id
    }

    /// Append a segment to an existing stroke.
    /// Returns false if the stroke is no longer on the surface.
    pub fn extend_stroke(&mut self, id: StrokeId, segment: Segment) -> bool {
        match self.strokes.get_mut(&id) {
            Some(stroke) => {
                stroke.push_segment(segment);
                true
            }
            None => false,
        }
    }

    /// Remove the most recently created stroke and nothing else.
    pub fn undo(&mut self) -> UndoOutcome {
        let Some(id) = self.undo_stack.pop() else {
            return UndoOutcome::NothingToUndo;
        };
        match self.strokes.remove(&id) {
            Some(stroke) => {
                log::debug!("Undo removed stroke {}", id);
                UndoOutcome::Removed(stroke)
            }
            None => UndoOutcome::NothingToUndo,
        }
    }

    /// Remove every stroke and empty the undo stack. Cannot be undone.
    pub fn clear(&mut self) {
        self.strokes.clear();
        self.undo_stack.clear();
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Number of entries on the undo stack.
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn get_stroke(&self, id: StrokeId) -> Option<&Stroke> {
        self.strokes.get(&id)
    }

    /// Strokes in paint order (oldest first).
    pub fn strokes_ordered(&self) -> impl Iterator<Item = &Stroke> {
        self.undo_stack.iter().filter_map(|id| self.strokes.get(id))
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Get the number of strokes.
    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    /// Size of the visible drawing area.
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn set_size(&mut self, size: Size) {
        if size.width > 0.0 && size.height > 0.0 {
            self.size = size;
        }
    }

    /// Get the bounding box of all strokes.
    pub fn bounds(&self) -> Option<Rect> {
        self.strokes_ordered()
            .map(Stroke::bounds)
            .reduce(|acc, bounds| acc.union(bounds))
    }

    /// Snapshot the surface as a vector page over the given background.
    pub fn vector_page(&self, background: SerializableColor) -> VectorPage {
        VectorPage {
            size: self.size,
            background,
            strokes: self
                .strokes_ordered()
                .map(|stroke| VectorStroke {
                    color: stroke.style.color,
                    width: f64::from(stroke.style.width),
                    cap: stroke.style.cap,
                    path: stroke.to_path(),
                })
                .collect(),
        }
    }
}

/// Application context: the surface plus the brush and pointer state that feed it.
#[derive(Debug, Clone, Default)]
pub struct Canvas {
    pub surface: DrawingSurface,
    pub brush: BrushState,
    pub pointer: PointerState,
}

impl Canvas {
    /// Create a canvas with the default brush.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a canvas with the given starting brush.
    pub fn with_brush(brush: BrushState) -> Self {
        Self {
            surface: DrawingSurface::new(),
            brush,
            pointer: PointerState::Idle,
        }
    }

    /// Route a pointer event through the drag state machine.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) -> Option<StrokeId> {
        self.pointer.handle(event, &self.brush, &mut self.surface)
    }

    pub fn choose_color(&mut self, color: SerializableColor) {
        self.brush.choose_color(color);
    }

    pub fn use_eraser(&mut self) {
        self.brush.use_eraser();
    }

    /// Set the brush size (clamped). Returns the size applied.
    pub fn set_brush_size(&mut self, size: u32) -> u32 {
        self.brush.set_size(size)
    }

    /// Undo the last stroke.
    /// Returns a notice for the user when there was nothing to undo.
    pub fn undo(&mut self) -> Option<Notice> {
        match self.surface.undo() {
            UndoOutcome::Removed(_) => None,
            UndoOutcome::NothingToUndo => Some(Notice::nothing_to_undo()),
        }
    }

    pub fn clear(&mut self) {
        log::info!("Clearing {} strokes", self.surface.len());
        self.surface.clear();
    }

    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.surface.set_size(Size::new(width, height));
    }

    /// Vector snapshot of the drawing over the current background.
    pub fn vector_page(&self) -> VectorPage {
        self.surface.vector_page(self.brush.background())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notice::NoticeLevel;
    use kurbo::Point;

    fn drag(canvas: &mut Canvas, from: (f64, f64), to: &[(f64, f64)]) {
        canvas.handle_pointer_event(PointerEvent::Down {
            position: Point::new(from.0, from.1),
        });
        for &(x, y) in to {
            canvas.handle_pointer_event(PointerEvent::Move {
                position: Point::new(x, y),
            });
        }
        let last = to.last().copied().unwrap_or(from);
        canvas.handle_pointer_event(PointerEvent::Up {
            position: Point::new(last.0, last.1),
        });
    }

    #[test]
    fn test_surface_creation() {
        let surface = DrawingSurface::new();
        assert!(surface.is_empty());
        assert!(!surface.can_undo());
        assert_eq!(surface.size(), DEFAULT_SURFACE_SIZE);
    }

    #[test]
    fn test_n_drags_then_n_undos() {
        let mut canvas = Canvas::new();
        for i in 0..4 {
            let y = f64::from(i) * 10.0;
            drag(&mut canvas, (0.0, y), &[(5.0, y), (10.0, y + 1.0)]);
        }
        assert_eq!(canvas.surface.undo_depth(), 4);
        assert_eq!(canvas.surface.len(), 4);

        for _ in 0..4 {
            assert!(canvas.undo().is_none());
        }
        assert!(canvas.surface.is_empty());
        assert_eq!(canvas.surface.undo_depth(), 0);
    }

    #[test]
    fn test_undo_removes_only_latest_stroke() {
        let mut canvas = Canvas::new();
        drag(&mut canvas, (0.0, 0.0), &[(1.0, 1.0)]);
        drag(&mut canvas, (10.0, 10.0), &[(11.0, 11.0)]);
        let first_id = canvas.surface.strokes_ordered().next().unwrap().id();

        match canvas.surface.undo() {
            UndoOutcome::Removed(stroke) => assert_ne!(stroke.id(), first_id),
            UndoOutcome::NothingToUndo => panic!("expected a stroke to be removed"),
        }
        assert_eq!(canvas.surface.len(), 1);
        assert!(canvas.surface.get_stroke(first_id).is_some());
    }

    #[test]
    fn test_undo_empty_stack() {
        let mut canvas = Canvas::new();
        let notice = canvas.undo().expect("empty undo should produce a notice");
        assert_eq!(notice.level, NoticeLevel::Info);
        assert_eq!(notice.message, "Nothing to undo.");
        assert!(canvas.surface.is_empty());
        assert_eq!(canvas.surface.undo_depth(), 0);
    }

    #[test]
    fn test_clear_then_undo_is_noop() {
        let mut canvas = Canvas::new();
        drag(&mut canvas, (0.0, 0.0), &[(1.0, 1.0)]);
        drag(&mut canvas, (5.0, 0.0), &[(6.0, 1.0)]);
        canvas.clear();
        assert!(canvas.surface.is_empty());
        assert_eq!(canvas.surface.undo_depth(), 0);

        assert!(canvas.undo().is_some());
        assert!(canvas.surface.is_empty());
    }

    #[test]
    fn test_undo_mid_drag_starts_new_stroke() {
        let mut canvas = Canvas::new();
        canvas.handle_pointer_event(PointerEvent::Down {
            position: Point::new(0.0, 0.0),
        });
        let first = canvas.handle_pointer_event(PointerEvent::Move {
            position: Point::new(5.0, 0.0),
        });
        assert!(canvas.undo().is_none());

        let resumed = canvas.handle_pointer_event(PointerEvent::Move {
            position: Point::new(10.0, 0.0),
        });
        canvas.handle_pointer_event(PointerEvent::Move {
            position: Point::new(20.0, 0.0),
        });
        canvas.handle_pointer_event(PointerEvent::Up {
            position: Point::new(20.0, 0.0),
        });

        assert_ne!(resumed, first);
        assert_eq!(canvas.surface.len(), 1);
        assert_eq!(canvas.surface.undo_depth(), 1);
        let stroke = canvas.surface.get_stroke(resumed.unwrap()).unwrap();
        assert_eq!(stroke.len(), 2);
        assert_eq!(stroke.segments()[0].start, Point::new(5.0, 0.0));
    }

    #[test]
    fn test_clear_mid_drag_keeps_drawing() {
        let mut canvas = Canvas::new();
        canvas.handle_pointer_event(PointerEvent::Down {
            position: Point::new(0.0, 0.0),
        });
        canvas.handle_pointer_event(PointerEvent::Move {
            position: Point::new(5.0, 5.0),
        });
        canvas.clear();
        canvas.handle_pointer_event(PointerEvent::Move {
            position: Point::new(9.0, 9.0),
        });
        assert_eq!(canvas.surface.len(), 1);
        assert_eq!(canvas.surface.undo_depth(), 1);
    }

    #[test]
    fn test_click_does_not_touch_undo_stack() {
        let mut canvas = Canvas::new();
        drag(&mut canvas, (0.0, 0.0), &[(1.0, 1.0)]);
        drag(&mut canvas, (3.0, 3.0), &[]);
        assert_eq!(canvas.surface.undo_depth(), 1);
        assert_eq!(canvas.surface.len(), 1);
    }

    #[test]
    fn test_eraser_stroke_keeps_drawing_time_background() {
        let mut canvas = Canvas::new();
        canvas.choose_color(SerializableColor::rgb(255, 0, 0));
        canvas.use_eraser();
        drag(&mut canvas, (0.0, 0.0), &[(4.0, 4.0)]);

        canvas.brush.set_background(SerializableColor::rgb(30, 30, 30));
        let stroke = canvas.surface.strokes_ordered().next().unwrap();
        assert_eq!(stroke.style.color, SerializableColor::white());
        assert_eq!(canvas.vector_page().background, SerializableColor::rgb(30, 30, 30));
    }

    #[test]
    fn test_vector_page_in_paint_order() {
        let mut canvas = Canvas::new();
        canvas.set_viewport_size(320.0, 240.0);
        canvas.choose_color(SerializableColor::rgb(1, 1, 1));
        drag(&mut canvas, (0.0, 0.0), &[(1.0, 1.0)]);
        canvas.choose_color(SerializableColor::rgb(2, 2, 2));
        drag(&mut canvas, (0.0, 0.0), &[(1.0, 1.0)]);

        let page = canvas.vector_page();
        assert_eq!(page.size, Size::new(320.0, 240.0));
        let colors: Vec<_> = page.strokes.iter().map(|s| s.color).collect();
        assert_eq!(
            colors,
            vec![SerializableColor::rgb(1, 1, 1), SerializableColor::rgb(2, 2, 2)]
        );
    }

    #[test]
    fn test_set_size_ignores_degenerate() {
        let mut surface = DrawingSurface::new();
        surface.set_size(Size::new(0.0, 100.0));
        assert_eq!(surface.size(), DEFAULT_SURFACE_SIZE);
    }

    #[test]
    fn test_bounds_union() {
        let mut canvas = Canvas::new();
        canvas.set_brush_size(2);
        drag(&mut canvas, (0.0, 0.0), &[(10.0, 0.0)]);
        drag(&mut canvas, (20.0, 20.0), &[(30.0, 30.0)]);
        let bounds = canvas.surface.bounds().unwrap();
        assert!((bounds.x0 + 1.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 31.0).abs() < f64::EPSILON);
    }
}

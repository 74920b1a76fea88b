//! Brush state driven by the toolbar.

use crate::shapes::{SerializableColor, StrokeStyle};

/// Smallest brush size offered by the toolbar.
pub const MIN_BRUSH_SIZE: u32 = 1;
/// Largest brush size offered by the toolbar.
pub const MAX_BRUSH_SIZE: u32 = 50;
/// Brush size at startup.
pub const DEFAULT_BRUSH_SIZE: u32 = 5;

/// Current color, size and background used for new strokes.
///
/// Never persisted; a fresh state is built at startup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushState {
    color: SerializableColor,
    size: u32,
    background: SerializableColor,
}

impl Default for BrushState {
    fn default() -> Self {
        Self {
            color: SerializableColor::black(),
            size: DEFAULT_BRUSH_SIZE,
            background: SerializableColor::white(),
        }
    }
}

impl BrushState {
    pub fn new(color: SerializableColor, size: u32, background: SerializableColor) -> Self {
        Self {
            color,
            size: clamp_brush_size(size),
            background,
        }
    }

    pub fn color(&self) -> SerializableColor {
        self.color
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn background(&self) -> SerializableColor {
        self.background
    }

    /// Set the stroke color picked by the user.
    pub fn choose_color(&mut self, color: SerializableColor) {
        self.color = color;
    }

    /// Switch to the eraser: the brush paints in the current background color.
    ///
    /// Strokes drawn this way keep that color even if the background changes later.
    pub fn use_eraser(&mut self) {
        self.color = self.background;
    }

    /// Set the background color. Existing strokes are not recolored.
    pub fn set_background(&mut self, color: SerializableColor) {
        self.background = color;
    }

    /// Set the brush size, clamped to `MIN_BRUSH_SIZE..=MAX_BRUSH_SIZE`.
    ///
    /// Returns the size actually applied.
    pub fn set_size(&mut self, size: u32) -> u32 {
        let clamped = clamp_brush_size(size);
        if clamped != size {
            log::debug!("Brush size {} clamped to {}", size, clamped);
        }
        self.size = clamped;
        clamped
    }

    /// Style for a stroke started now.
    pub fn stroke_style(&self) -> StrokeStyle {
        StrokeStyle::new(self.color, self.size)
    }
}

fn clamp_brush_size(size: u32) -> u32 {
    size.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let brush = BrushState::default();
        assert_eq!(brush.color(), SerializableColor::black());
        assert_eq!(brush.size(), 5);
        assert_eq!(brush.background(), SerializableColor::white());
    }

    #[test]
    fn test_size_boundaries_accepted() {
        let mut brush = BrushState::default();
        assert_eq!(brush.set_size(1), 1);
        assert_eq!(brush.size(), 1);
        assert_eq!(brush.set_size(50), 50);
        assert_eq!(brush.size(), 50);
    }

    #[test]
    fn test_size_out_of_range_is_clamped() {
        let mut brush = BrushState::default();
        assert_eq!(brush.set_size(0), MIN_BRUSH_SIZE);
        assert_eq!(brush.set_size(51), MAX_BRUSH_SIZE);
        assert_eq!(brush.set_size(u32::MAX), MAX_BRUSH_SIZE);
        assert_eq!(BrushState::new(SerializableColor::black(), 0, SerializableColor::white()).size(), 1);
    }

    #[test]
    fn test_eraser_uses_background() {
        let mut brush = BrushState::default();
        brush.choose_color(SerializableColor::rgb(200, 10, 10));
        brush.use_eraser();
        assert_eq!(brush.color(), SerializableColor::white());

        // Changing the background afterwards does not follow the eraser.
        brush.set_background(SerializableColor::rgb(0, 0, 255));
        assert_eq!(brush.color(), SerializableColor::white());
    }

    #[test]
    fn test_stroke_style_snapshot() {
        let mut brush = BrushState::default();
        brush.choose_color(SerializableColor::rgb(1, 2, 3));
        brush.set_size(12);
        let style = brush.stroke_style();
        assert_eq!(style.color, SerializableColor::rgb(1, 2, 3));
        assert_eq!(style.width, 12);
    }
}

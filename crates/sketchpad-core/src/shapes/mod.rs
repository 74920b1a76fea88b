//! Stroke primitives and their style.

mod stroke;

pub use stroke::{Segment, Stroke};

use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier of a stroke on a drawing surface.
pub type StrokeId = Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    pub const fn white() -> Self {
        Self::rgb(255, 255, 255)
    }

    /// Parse a `#rrggbb` (or `rrggbb`) hex string.
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self::rgb(r, g, b))
    }

    /// Format as a lowercase `#rrggbb` string (alpha is dropped).
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// RGB components scaled to `0.0..=1.0`.
    pub fn to_unit_rgb(&self) -> [f64; 3] {
        [
            f64::from(self.r) / 255.0,
            f64::from(self.g) / 255.0,
            f64::from(self.b) / 255.0,
        ]
    }

    /// Build an opaque color from unit RGB components, clamping out-of-range values.
    pub fn from_unit_rgb(r: f64, g: f64, b: f64) -> Self {
        let channel = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::rgb(channel(r), channel(g), channel(b))
    }
}

impl fmt::Display for SerializableColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Line cap style. Freehand strokes always use round caps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CapStyle {
    Butt,
    #[default]
    Round,
    Square,
}

impl CapStyle {
    /// PostScript `setlinecap` operand.
    pub fn postscript_code(self) -> u8 {
        match self {
            CapStyle::Butt => 0,
            CapStyle::Round => 1,
            CapStyle::Square => 2,
        }
    }

    pub fn from_postscript_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(CapStyle::Butt),
            1 => Some(CapStyle::Round),
            2 => Some(CapStyle::Square),
            _ => None,
        }
    }
}

/// Style captured from the brush when a stroke starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    /// Flat stroke color.
    pub color: SerializableColor,
    /// Line width in pixels.
    pub width: u32,
    pub cap: CapStyle,
    /// Render the segments as one continuous smoothed polyline.
    pub smooth: bool,
}

impl StrokeStyle {
    pub fn new(color: SerializableColor, width: u32) -> Self {
        Self {
            color,
            width,
            cap: CapStyle::Round,
            smooth: true,
        }
    }
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self::new(SerializableColor::black(), crate::brush::DEFAULT_BRUSH_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parse_and_format() {
        let color = SerializableColor::from_hex("#1a2B3c").unwrap();
        assert_eq!(color, SerializableColor::rgb(0x1a, 0x2b, 0x3c));
        assert_eq!(color.to_hex(), "#1a2b3c");
        assert_eq!(SerializableColor::from_hex("ffffff"), Some(SerializableColor::white()));
    }

    #[test]
    fn test_hex_parse_rejects_garbage() {
        assert!(SerializableColor::from_hex("#fff").is_none());
        assert!(SerializableColor::from_hex("#gg0000").is_none());
        assert!(SerializableColor::from_hex("").is_none());
    }

    #[test]
    fn test_unit_rgb_clamps() {
        let color = SerializableColor::from_unit_rgb(1.5, 0.5, -0.2);
        assert_eq!(color, SerializableColor::rgb(255, 128, 0));
    }

    #[test]
    fn test_default_style_is_round_and_smooth() {
        let style = StrokeStyle::default();
        assert_eq!(style.cap, CapStyle::Round);
        assert!(style.smooth);
        assert_eq!(style.width, 5);
    }
}

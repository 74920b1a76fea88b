//! CPU rasterization of vector pages with tiny-skia.

use kurbo::{BezPath, PathEl};
use peniko::Color;
use sketchpad_core::export::{VectorPage, VectorStroke};
use sketchpad_core::shapes::CapStyle;
use thiserror::Error;
use tiny_skia::{LineCap, LineJoin, Paint, PathBuilder, Transform};

/// Largest pixmap edge accepted, in pixels.
pub const MAX_PIXMAP_EDGE: u32 = 16_384;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Invalid pixmap size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("Encoding failed: {0}")]
    EncodeFailed(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Options for a single rasterization.
#[derive(Debug, Clone, Copy)]
pub struct RasterOptions {
    /// Device pixels per page unit.
    pub scale: f64,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

impl RasterOptions {
    /// Set the output scale (e.g. 2.0 for double resolution).
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }
}

/// Rendered page. Pixels are opaque; the background is always filled.
#[derive(Debug, Clone)]
pub struct Pixmap {
    inner: tiny_skia::Pixmap,
}

impl Pixmap {
    /// Create a pixmap filled with `fill`.
    pub fn new(width: u32, height: u32, fill: Color) -> RenderResult<Self> {
        if width > MAX_PIXMAP_EDGE || height > MAX_PIXMAP_EDGE {
            return Err(RendererError::InvalidSize { width, height });
        }
        let mut inner = tiny_skia::Pixmap::new(width, height)
            .ok_or(RendererError::InvalidSize { width, height })?;
        let rgba = fill.to_rgba8();
        inner.fill(tiny_skia::Color::from_rgba8(rgba.r, rgba.g, rgba.b, 255));
        Ok(Self { inner })
    }

    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    /// Straight-alpha RGBA bytes, row-major, top row first.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.inner
            .pixels()
            .iter()
            .flat_map(|px| {
                let c = px.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let c = self.inner.pixel(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }
}

/// Rasterize a page: background fill, then every stroke in order.
pub fn rasterize(page: &VectorPage, options: RasterOptions) -> RenderResult<Pixmap> {
    let (width, height) = page.page_extent();
    let scale = options.scale.max(f64::EPSILON);
    let px_width = (f64::from(width) * scale).ceil() as u32;
    let px_height = (f64::from(height) * scale).ceil() as u32;

    let mut pixmap = Pixmap::new(px_width, px_height, Color::from(page.background))?;
    let transform = Transform::from_scale(scale as f32, scale as f32);
    for stroke in &page.strokes {
        paint_stroke(&mut pixmap.inner, stroke, transform);
    }
    Ok(pixmap)
}

fn to_skia_path(path: &BezPath) -> Option<tiny_skia::Path> {
    let mut builder = PathBuilder::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => builder.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => builder.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(p1, p2) => {
                builder.quad_to(p1.x as f32, p1.y as f32, p2.x as f32, p2.y as f32)
            }
            PathEl::CurveTo(p1, p2, p3) => builder.cubic_to(
                p1.x as f32,
                p1.y as f32,
                p2.x as f32,
                p2.y as f32,
                p3.x as f32,
                p3.y as f32,
            ),
            PathEl::ClosePath => builder.close(),
        }
    }
    builder.finish()
}

fn line_cap(cap: CapStyle) -> LineCap {
    match cap {
        CapStyle::Butt => LineCap::Butt,
        CapStyle::Round => LineCap::Round,
        CapStyle::Square => LineCap::Square,
    }
}

fn paint_stroke(pixmap: &mut tiny_skia::Pixmap, stroke: &VectorStroke, transform: Transform) {
    let Some(path) = to_skia_path(&stroke.path) else {
        log::debug!("Skipping stroke with an empty path");
        return;
    };

    let mut paint = Paint::default();
    let c = stroke.color;
    paint.set_color_rgba8(c.r, c.g, c.b, 255);
    paint.anti_alias = true;

    let style = tiny_skia::Stroke {
        width: stroke.width as f32,
        line_cap: line_cap(stroke.cap),
        line_join: LineJoin::Round,
        ..Default::default()
    };
    pixmap.stroke_path(&path, &paint, &style, transform, None);
}

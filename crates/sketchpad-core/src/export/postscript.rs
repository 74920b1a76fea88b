//! PostScript page description of a drawing.
//!
//! The writer emits a single-page EPS document: the page is filled with the
//! background color and every stroke is painted in order with round caps and
//! joins. The reader understands exactly that subset, which lets raster
//! backends interpret the file without a full PostScript interpreter.

use crate::shapes::{CapStyle, SerializableColor};
use kurbo::{BezPath, PathEl, Point, QuadBez, Size};
use std::fmt::Write as _;
use thiserror::Error;

/// One painted path of a page, in surface coordinates (y grows downwards).
#[derive(Debug, Clone, PartialEq)]
pub struct VectorStroke {
    pub color: SerializableColor,
    pub width: f64,
    pub cap: CapStyle,
    pub path: BezPath,
}

/// Resolution-independent description of the drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorPage {
    pub size: Size,
    pub background: SerializableColor,
    pub strokes: Vec<VectorStroke>,
}

impl VectorPage {
    /// Page size rounded up to whole points, as written in the bounding box.
    pub fn page_extent(&self) -> (u32, u32) {
        (
            self.size.width.ceil().max(1.0) as u32,
            self.size.height.ceil().max(1.0) as u32,
        )
    }
}

/// Errors raised while reading a PostScript page.
#[derive(Debug, Error, PartialEq)]
pub enum PostScriptError {
    #[error("Not a PostScript document")]
    NotPostScript,
    #[error("Missing %%BoundingBox comment")]
    MissingBoundingBox,
    #[error("Line {line}: malformed %%BoundingBox")]
    InvalidBoundingBox { line: usize },
    #[error("Line {line}: unsupported operator `{op}`")]
    UnknownOperator { line: usize, op: String },
    #[error("Line {line}: `{op}` needs {needed} operands")]
    StackUnderflow {
        line: usize,
        op: &'static str,
        needed: usize,
    },
    #[error("Line {line}: `{op}` without a current point")]
    NoCurrentPoint { line: usize, op: &'static str },
    #[error("Line {line}: invalid line cap {code}")]
    InvalidLineCap { line: usize, code: f64 },
    #[error("Line {line}: grestore without matching gsave")]
    UnbalancedGrestore { line: usize },
}

/// Serialize a page to EPS text.
pub fn write_document(page: &VectorPage) -> String {
    let (width, height) = page.page_extent();
    let flip = f64::from(height);
    let mut out = String::new();

    out.push_str("%!PS-Adobe-3.0 EPSF-3.0\n");
    out.push_str("%%Creator: SketchPad\n");
    let _ = writeln!(out, "%%BoundingBox: 0 0 {} {}", width, height);
    out.push_str("%%Pages: 1\n");
    out.push_str("%%EndComments\n");
    out.push_str("%%Page: 1 1\n");
    out.push_str("gsave\n");
    let _ = writeln!(out, "{} setrgbcolor", rgb_operands(page.background));
    let _ = writeln!(out, "0 0 {} {} rectfill", width, height);
    out.push_str("1 setlinejoin\n");

    for stroke in &page.strokes {
        let _ = writeln!(out, "{} setrgbcolor", rgb_operands(stroke.color));
        let _ = writeln!(out, "{} setlinewidth", num(stroke.width));
        let _ = writeln!(out, "{} setlinecap", stroke.cap.postscript_code());
        out.push_str("newpath\n");
        write_path(&mut out, &stroke.path, flip);
        out.push_str("stroke\n");
    }

    out.push_str("grestore\n");
    out.push_str("showpage\n");
    out.push_str("%%EOF\n");
    out
}

fn write_path(out: &mut String, path: &BezPath, flip: f64) {
    let to_ps = |p: Point| format!("{} {}", num(p.x), num(flip - p.y));
    let mut last = Point::ZERO;
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => {
                let _ = writeln!(out, "{} moveto", to_ps(p));
                last = p;
            }
            PathEl::LineTo(p) => {
                let _ = writeln!(out, "{} lineto", to_ps(p));
                last = p;
            }
            PathEl::QuadTo(p1, p2) => {
                let cubic = QuadBez::new(last, p1, p2).raise();
                let _ = writeln!(
                    out,
                    "{} {} {} curveto",
                    to_ps(cubic.p1),
                    to_ps(cubic.p2),
                    to_ps(cubic.p3)
                );
                last = p2;
            }
            PathEl::CurveTo(p1, p2, p3) => {
                let _ = writeln!(out, "{} {} {} curveto", to_ps(p1), to_ps(p2), to_ps(p3));
                last = p3;
            }
            PathEl::ClosePath => out.push_str("closepath\n"),
        }
    }
}

fn rgb_operands(color: SerializableColor) -> String {
    let [r, g, b] = color.to_unit_rgb();
    format!("{} {} {}", num(r), num(g), num(b))
}

/// Format a number with at most three decimals and no trailing zeros.
fn num(value: f64) -> String {
    let formatted = format!("{:.3}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "" | "-0" => "0".to_string(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, Copy)]
struct GraphicsState {
    color: SerializableColor,
    width: f64,
    cap: CapStyle,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            color: SerializableColor::black(),
            width: 1.0,
            cap: CapStyle::Butt,
        }
    }
}

struct Reader {
    size: Size,
    background: SerializableColor,
    strokes: Vec<VectorStroke>,
    stack: Vec<f64>,
    state: GraphicsState,
    saved: Vec<GraphicsState>,
    path: BezPath,
    current: Option<Point>,
}

impl Reader {
    fn pop<const N: usize>(&mut self, line: usize, op: &'static str) -> Result<[f64; N], PostScriptError> {
        if self.stack.len() < N {
            return Err(PostScriptError::StackUnderflow { line, op, needed: N });
        }
        let mut values = [0.0; N];
        values.copy_from_slice(&self.stack[self.stack.len() - N..]);
        self.stack.truncate(self.stack.len() - N);
        Ok(values)
    }

    /// Convert PostScript coordinates back to surface coordinates.
    fn point(&self, x: f64, y: f64) -> Point {
        Point::new(x, self.size.height - y)
    }

    fn require_current(&self, line: usize, op: &'static str) -> Result<(), PostScriptError> {
        if self.current.is_none() {
            return Err(PostScriptError::NoCurrentPoint { line, op });
        }
        Ok(())
    }

    fn operator(&mut self, line: usize, token: &str) -> Result<(), PostScriptError> {
        match token {
            "setrgbcolor" => {
                let [r, g, b] = self.pop(line, "setrgbcolor")?;
                self.state.color = SerializableColor::from_unit_rgb(r, g, b);
            }
            "setlinewidth" => {
                let [w] = self.pop(line, "setlinewidth")?;
                self.state.width = w;
            }
            "setlinecap" => {
                let [code] = self.pop(line, "setlinecap")?;
                self.state.cap = CapStyle::from_postscript_code(code as u8)
                    .filter(|_| code.fract() == 0.0 && code >= 0.0)
                    .ok_or(PostScriptError::InvalidLineCap { line, code })?;
            }
            "setlinejoin" => {
                self.pop::<1>(line, "setlinejoin")?;
            }
            "rectfill" => {
                let [x, y, w, h] = self.pop(line, "rectfill")?;
                let covers_page = x <= 0.0
                    && y <= 0.0
                    && x + w >= self.size.width
                    && y + h >= self.size.height;
                if !covers_page {
                    return Err(PostScriptError::UnknownOperator {
                        line,
                        op: "rectfill (partial page)".to_string(),
                    });
                }
                self.background = self.state.color;
                self.strokes.clear();
            }
            "newpath" => {
                self.path = BezPath::new();
                self.current = None;
            }
            "moveto" => {
                let [x, y] = self.pop(line, "moveto")?;
                let p = self.point(x, y);
                self.path.move_to(p);
                self.current = Some(p);
            }
            "lineto" => {
                let [x, y] = self.pop(line, "lineto")?;
                self.require_current(line, "lineto")?;
                let p = self.point(x, y);
                self.path.line_to(p);
                self.current = Some(p);
            }
            "curveto" => {
                let [x1, y1, x2, y2, x3, y3] = self.pop(line, "curveto")?;
                self.require_current(line, "curveto")?;
                let (p1, p2, p3) = (self.point(x1, y1), self.point(x2, y2), self.point(x3, y3));
                self.path.curve_to(p1, p2, p3);
                self.current = Some(p3);
            }
            "closepath" => {
                self.require_current(line, "closepath")?;
                self.path.close_path();
            }
            "stroke" => {
                let path = std::mem::take(&mut self.path);
                if !path.elements().is_empty() {
                    self.strokes.push(VectorStroke {
                        color: self.state.color,
                        width: self.state.width,
                        cap: self.state.cap,
                        path,
                    });
                }
                self.current = None;
            }
            "gsave" => self.saved.push(self.state),
            "grestore" => {
                self.state = self
                    .saved
                    .pop()
                    .ok_or(PostScriptError::UnbalancedGrestore { line })?;
            }
            "showpage" => {}
            other => {
                return Err(PostScriptError::UnknownOperator {
                    line,
                    op: other.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Parse a document produced by [`write_document`] back into a page.
pub fn parse_document(source: &str) -> Result<VectorPage, PostScriptError> {
    if !source.trim_start().starts_with("%!PS") {
        return Err(PostScriptError::NotPostScript);
    }

    let mut size = None;
    for (index, raw) in source.lines().enumerate() {
        if let Some(rest) = raw.trim().strip_prefix("%%BoundingBox:") {
            let values: Vec<f64> = rest
                .split_whitespace()
                .map(str::parse)
                .collect::<Result<_, _>>()
                .map_err(|_| PostScriptError::InvalidBoundingBox { line: index + 1 })?;
            let [x0, y0, x1, y1] = values[..] else {
                return Err(PostScriptError::InvalidBoundingBox { line: index + 1 });
            };
            if !values.iter().all(|v| v.is_finite()) || x1 <= x0 || y1 <= y0 {
                return Err(PostScriptError::InvalidBoundingBox { line: index + 1 });
            }
            size = Some(Size::new(x1 - x0, y1 - y0));
            break;
        }
    }
    let size = size.ok_or(PostScriptError::MissingBoundingBox)?;

    let mut reader = Reader {
        size,
        background: SerializableColor::white(),
        strokes: Vec::new(),
        stack: Vec::new(),
        state: GraphicsState::default(),
        saved: Vec::new(),
        path: BezPath::new(),
        current: None,
    };

    for (index, raw) in source.lines().enumerate() {
        let line = index + 1;
        let code = match raw.find('%') {
            Some(pos) => &raw[..pos],
            None => raw,
        };
        for token in code.split_whitespace() {
            match token.parse::<f64>() {
                Ok(value) if value.is_finite() => reader.stack.push(value),
                _ => reader.operator(line, token)?,
            }
        }
    }

    Ok(VectorPage {
        size,
        background: reader.background,
        strokes: reader.strokes,
    })
}

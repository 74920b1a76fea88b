//! Freehand stroke made of pointer-sample segments.

use super::{StrokeId, StrokeStyle};
use kurbo::{BezPath, Line, Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Straight line between two consecutive pointer samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn line(&self) -> Line {
        Line::new(self.start, self.end)
    }

    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }
}

/// One continuous freehand line drawn during a single drag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stroke {
    pub(crate) id: StrokeId,
    segments: Vec<Segment>,
    /// Style properties, fixed when the stroke was started.
    pub style: StrokeStyle,
}

impl Stroke {
    /// Create a new empty stroke.
    pub fn new(style: StrokeStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            segments: Vec::new(),
            style,
        }
    }

    /// Create a stroke from an existing segment list.
    pub fn from_segments(style: StrokeStyle, segments: Vec<Segment>) -> Self {
        Self {
            id: Uuid::new_v4(),
            segments,
            style,
        }
    }

    pub fn id(&self) -> StrokeId {
        self.id
    }

    /// Append a segment to the stroke.
    pub fn push_segment(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The polyline vertices: the first segment's start followed by every segment end.
    pub fn points(&self) -> Vec<Point> {
        let mut points = Vec::with_capacity(self.segments.len() + 1);
        if let Some(first) = self.segments.first() {
            points.push(first.start);
        }
        points.extend(self.segments.iter().map(|s| s.end));
        points
    }

    /// Bounding box including half the line width on every side.
    pub fn bounds(&self) -> Rect {
        let points = self.points();
        let Some(first) = points.first() else {
            return Rect::ZERO;
        };
        let rect = points
            .iter()
            .skip(1)
            .fold(Rect::from_points(*first, *first), |r, p| r.union_pt(*p));
        rect.inflate(
            f64::from(self.style.width) / 2.0,
            f64::from(self.style.width) / 2.0,
        )
    }

    /// Path used for rendering and export.
    ///
    /// Smoothed strokes pass through the first and last sample and use the
    /// interior samples as quadratic control points between segment midpoints.
    pub fn to_path(&self) -> BezPath {
        let points = self.points();
        let mut path = BezPath::new();
        let Some(&first) = points.first() else {
            return path;
        };
        path.move_to(first);

        if !self.style.smooth || points.len() < 3 {
            for point in &points[1..] {
                path.line_to(*point);
            }
            return path;
        }

        path.line_to(first.midpoint(points[1]));
        for pair in points[1..].windows(2) {
            path.quad_to(pair[0], pair[0].midpoint(pair[1]));
        }
        if let Some(&last) = points.last() {
            path.line_to(last);
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::SerializableColor;
    use kurbo::PathEl;

    fn style(width: u32) -> StrokeStyle {
        StrokeStyle::new(SerializableColor::black(), width)
    }

    fn zigzag() -> Stroke {
        Stroke::from_segments(
            style(4),
            vec![
                Segment::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0)),
                Segment::new(Point::new(10.0, 10.0), Point::new(20.0, 0.0)),
                Segment::new(Point::new(20.0, 0.0), Point::new(30.0, 10.0)),
            ],
        )
    }

    #[test]
    fn test_new_stroke_is_empty() {
        let stroke = Stroke::new(style(5));
        assert!(stroke.is_empty());
        assert!(stroke.points().is_empty());
        assert_eq!(stroke.bounds(), Rect::ZERO);
    }

    #[test]
    fn test_points_follow_segments() {
        let stroke = zigzag();
        assert_eq!(stroke.len(), 3);
        assert_eq!(
            stroke.points(),
            vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 10.0),
                Point::new(20.0, 0.0),
                Point::new(30.0, 10.0),
            ]
        );
    }

    #[test]
    fn test_bounds_include_half_width() {
        let bounds = zigzag().bounds();
        assert!((bounds.x0 + 2.0).abs() < f64::EPSILON);
        assert!((bounds.y0 + 2.0).abs() < f64::EPSILON);
        assert!((bounds.x1 - 32.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 12.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_smooth_path_keeps_endpoints() {
        let path = zigzag().to_path();
        let elements = path.elements();
        assert_eq!(elements.first(), Some(&PathEl::MoveTo(Point::new(0.0, 0.0))));
        assert_eq!(elements.last(), Some(&PathEl::LineTo(Point::new(30.0, 10.0))));
        let quads = elements
            .iter()
            .filter(|el| matches!(el, PathEl::QuadTo(..)))
            .count();
        assert_eq!(quads, 2);
    }

    #[test]
    fn test_single_segment_path_is_a_line() {
        let stroke = Stroke::from_segments(
            style(3),
            vec![Segment::new(Point::new(1.0, 2.0), Point::new(5.0, 6.0))],
        );
        let path = stroke.to_path();
        assert_eq!(
            path.elements(),
            &[
                PathEl::MoveTo(Point::new(1.0, 2.0)),
                PathEl::LineTo(Point::new(5.0, 6.0)),
            ]
        );
    }
}

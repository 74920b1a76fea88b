//! Pointer drag state machine that turns pointer samples into stroke segments.

use crate::brush::BrushState;
use crate::canvas::DrawingSurface;
use crate::shapes::{Segment, StrokeId};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Primary-button pointer event in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point },
    Move { position: Point },
    Up { position: Point },
}

impl PointerEvent {
    pub fn position(&self) -> Point {
        match *self {
            PointerEvent::Down { position }
            | PointerEvent::Move { position }
            | PointerEvent::Up { position } => position,
        }
    }
}

/// Drag lifecycle state.
///
/// `Dragging` holds the last observed pointer position (the anchor) and the
/// stroke being built, which only exists once the first segment is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PointerState {
    #[default]
    Idle,
    Dragging {
        anchor: Point,
        stroke: Option<StrokeId>,
    },
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, PointerState::Dragging { .. })
    }

    /// Last observed pointer position of the active drag.
    pub fn anchor(&self) -> Option<Point> {
        match self {
            PointerState::Idle => None,
            PointerState::Dragging { anchor, .. } => Some(*anchor),
        }
    }

    /// Stroke created by the active drag, if it has emitted a segment yet.
    pub fn active_stroke(&self) -> Option<StrokeId> {
        match self {
            PointerState::Idle => None,
            PointerState::Dragging { stroke, .. } => *stroke,
        }
    }

    /// Feed one pointer event through the state machine.
    ///
    /// Returns the id of the stroke that received a segment, if any.
    pub fn handle(
        &mut self,
        event: PointerEvent,
        brush: &BrushState,
        surface: &mut DrawingSurface,
    ) -> Option<StrokeId> {
        match event {
            PointerEvent::Down { position } => {
                if let PointerState::Dragging { stroke: Some(id), .. } = self {
                    log::debug!("Pointer pressed mid-drag, finalizing stroke {}", id);
                }
                *self = PointerState::Dragging {
                    anchor: position,
                    stroke: None,
                };
                None
            }
            PointerEvent::Move { position } => {
                let PointerState::Dragging { anchor, stroke } = self else {
                    return None;
                };
                if *anchor == position {
                    return None;
                }

                let segment = Segment::new(*anchor, position);
                let id = match *stroke {
                    Some(id) if surface.extend_stroke(id, segment) => id,
                    previous => {
                        if let Some(gone) = previous {
                            log::debug!("Stroke {} removed mid-drag, starting a new one", gone);
                        }
                        let id = surface.begin_stroke(brush.stroke_style(), segment);
                        *stroke = Some(id);
                        id
                    }
                };
                *anchor = position;
                Some(id)
            }
            PointerEvent::Up { .. } => {
                if let PointerState::Dragging { stroke: Some(id), .. } = self {
                    log::debug!("Stroke {} finalized", id);
                }
                *self = PointerState::Idle;
                None
            }
        }
    }
}

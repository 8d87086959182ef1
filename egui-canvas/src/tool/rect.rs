use egui::Pos2;
use log::debug;

use crate::{RectShape, SurfaceDocument, Tool, ToolContext};

/// One press-to-release gesture. The in-progress rect lives in the
/// document itself; it exists exactly while the session is dragging and is
/// never removed, only finalized.
#[derive(Default)]
pub struct DragSession {
    active: Option<ActiveDrag>,
}

struct ActiveDrag {
    start: Pos2,
    rect_idx: usize,
}

impl DragSession {
    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// Idle -> Dragging. Appends a zero-size rect at the press position.
    /// A press while already dragging is ignored, so a session never owns
    /// more than one rect.
    pub fn press(&mut self, doc: &mut SurfaceDocument, pos: Pos2) {
        if self.active.is_some() {
            return;
        }
        let rect_idx = doc.append_rect(RectShape::drag_default(pos.x, pos.y));
        self.active = Some(ActiveDrag {
            start: pos,
            rect_idx,
        });
    }

    /// Grows or shrinks the in-progress rect so it spans the start and the
    /// current position regardless of drag direction. No-op while idle.
    pub fn motion(&mut self, doc: &mut SurfaceDocument, pos: Pos2) {
        let Some(drag) = &self.active else { return };
        let Some(rect) = doc.rect_mut(drag.rect_idx) else {
            return;
        };
        rect.width = (pos.x - drag.start.x).abs();
        rect.height = (pos.y - drag.start.y).abs();
        rect.x = pos.x.min(drag.start.x);
        rect.y = pos.y.min(drag.start.y);
    }

    /// Dragging -> Idle. Returns the finalized shape read back from the
    /// document. Duplicate releases are no-ops returning `None`.
    pub fn release(&mut self, doc: &SurfaceDocument) -> Option<RectShape> {
        let drag = self.active.take()?;
        let shape = doc.rect(drag.rect_idx).cloned();
        debug!("Drag finished: {shape:?}");
        shape
    }
}

#[derive(Default)]
#[non_exhaustive]
pub struct RectTool {
    session: DragSession,
}

impl Tool for RectTool {
    fn handle_interaction(&mut self, ctx: ToolContext) {
        if ctx.response.drag_started() {
            if let Some(pos) = ctx.cursor_surface_pos {
                self.session.press(ctx.doc, pos);
            }
        } else if ctx.response.dragged() {
            if let Some(pos) = ctx.cursor_surface_pos {
                self.session.motion(ctx.doc, pos);
            }
        }

        // Leaving the canvas mid-drag finalizes like a release would.
        let left_surface = self.session.is_dragging() && ctx.cursor_surface_pos.is_none();
        if ctx.response.drag_stopped() || left_surface {
            if let Some(shape) = self.session.release(ctx.doc) {
                ctx.finished.push(shape);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> SurfaceDocument {
        SurfaceDocument::new_canvas(800, 600)
    }

    #[test]
    fn drag_normalizes_any_direction() {
        let mut doc = canvas();
        let mut session = DragSession::default();

        session.press(&mut doc, Pos2::new(50.0, 80.0));
        session.motion(&mut doc, Pos2::new(120.0, 40.0));
        let shape = session.release(&doc).unwrap();

        assert_eq!(
            (shape.x, shape.y, shape.width, shape.height),
            (50.0, 40.0, 70.0, 40.0)
        );
        assert_eq!(shape.fill, "none");
        assert_eq!(shape.stroke, "black");
        assert_eq!(shape.stroke_width, 2.0);
        assert!(!session.is_dragging());
    }

    #[test]
    fn rect_starts_zero_sized_and_mutates_in_place() {
        let mut doc = canvas();
        let mut session = DragSession::default();

        session.press(&mut doc, Pos2::new(10.0, 10.0));
        assert_eq!(doc.shapes().len(), 1);
        assert_eq!((doc.shapes()[0].width, doc.shapes()[0].height), (0.0, 0.0));

        session.motion(&mut doc, Pos2::new(30.0, 25.0));
        session.motion(&mut doc, Pos2::new(5.0, 50.0));
        assert_eq!(doc.shapes().len(), 1);
        let rect = &doc.shapes()[0];
        assert_eq!((rect.x, rect.y, rect.width, rect.height), (5.0, 10.0, 5.0, 40.0));
    }

    #[test]
    fn release_while_idle_is_a_no_op() {
        let mut doc = canvas();
        let mut session = DragSession::default();
        assert_eq!(session.release(&doc), None);
        assert!(doc.shapes().is_empty());

        session.press(&mut doc, Pos2::new(1.0, 1.0));
        assert!(session.release(&doc).is_some());
        // A duplicate release (e.g. mouseup after mouseleave) stays silent.
        assert_eq!(session.release(&doc), None);
    }

    #[test]
    fn second_press_does_not_start_a_second_rect() {
        let mut doc = canvas();
        let mut session = DragSession::default();

        session.press(&mut doc, Pos2::new(10.0, 10.0));
        session.press(&mut doc, Pos2::new(99.0, 99.0));
        assert_eq!(doc.shapes().len(), 1);

        session.motion(&mut doc, Pos2::new(20.0, 20.0));
        let shape = session.release(&doc).unwrap();
        assert_eq!((shape.x, shape.y), (10.0, 10.0));
    }

    #[test]
    fn motion_while_idle_changes_nothing() {
        let mut doc = canvas();
        let mut session = DragSession::default();
        session.motion(&mut doc, Pos2::new(42.0, 42.0));
        assert!(doc.shapes().is_empty());
    }

    #[test]
    fn finalized_rect_stays_in_the_document() {
        let mut doc = canvas();
        let mut session = DragSession::default();
        session.press(&mut doc, Pos2::new(0.0, 0.0));
        session.motion(&mut doc, Pos2::new(10.0, 10.0));
        session.release(&doc);
        assert_eq!(doc.shapes().len(), 1);

        // The next session appends a fresh rect.
        session.press(&mut doc, Pos2::new(20.0, 20.0));
        assert_eq!(doc.shapes().len(), 2);
    }
}

mod rect;

pub use rect::*;

use egui::Pos2;

use crate::{RectShape, SurfaceDocument};

pub trait Tool {
    fn handle_interaction(&mut self, ctx: ToolContext);
}

#[non_exhaustive]
pub struct ToolContext<'a> {
    pub doc: &'a mut SurfaceDocument,
    pub response: egui::Response,
    /// Pointer position in surface coordinates, `None` while the pointer
    /// is outside the canvas.
    pub cursor_surface_pos: Option<Pos2>,
    /// Shapes finalized during this frame, to be persisted by the caller.
    pub finished: &'a mut Vec<RectShape>,
}

impl<'a> ToolContext<'a> {
    pub fn new(
        doc: &'a mut SurfaceDocument,
        response: egui::Response,
        cursor_surface_pos: Option<Pos2>,
        finished: &'a mut Vec<RectShape>,
    ) -> Self {
        Self {
            doc,
            response,
            cursor_surface_pos,
            finished,
        }
    }
}

use egui::{self, Color32, InnerResponse, Pos2, Rect, Sense, Stroke, StrokeKind, Vec2};

use crate::SurfaceDocument;

/// Renders a [`SurfaceDocument`] letterboxed into the available viewport
/// and reports pointer positions in surface coordinates.
#[derive(Default)]
#[non_exhaustive]
pub struct SurfaceViewer;

/// Mapping between surface and screen coordinates for the current frame.
#[derive(Clone, Copy, Debug)]
pub struct SurfaceTransform {
    origin: Pos2,
    scale: f32,
}

impl SurfaceTransform {
    pub fn to_screen(&self, pos: Pos2) -> Pos2 {
        self.origin + pos.to_vec2() * self.scale
    }

    pub fn to_surface(&self, pos: Pos2) -> Pos2 {
        ((pos - self.origin) / self.scale).to_pos2()
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }
}

pub struct SurfaceInteraction {
    pub transform: SurfaceTransform,
    /// Pointer position relative to the canvas, `None` when outside it.
    pub cursor_surface_pos: Option<Pos2>,
}

impl SurfaceViewer {
    pub fn ui(
        &self,
        ui: &mut egui::Ui,
        doc: &SurfaceDocument,
        sense: Option<Sense>,
    ) -> InnerResponse<Option<SurfaceInteraction>> {
        let viewport = ui.available_rect_before_wrap();
        let doc_size = Vec2::new(doc.width() as f32, doc.height() as f32);
        if doc_size.x <= 0.0 || doc_size.y <= 0.0 || viewport.width() <= 0.0 || viewport.height() <= 0.0 {
            return InnerResponse {
                inner: None,
                response: ui.response(),
            };
        }

        let my_sense = Sense::hover().union(Sense::drag());
        let combined_sense = sense.map(|s| s.union(my_sense)).unwrap_or(my_sense);
        let response = ui.allocate_rect(viewport, combined_sense);

        let fit_scale = (viewport.width() / doc_size.x).min(viewport.height() / doc_size.y);
        let canvas_size = doc_size * fit_scale;
        let transform = SurfaceTransform {
            origin: viewport.min + (viewport.size() - canvas_size) * 0.5,
            scale: fit_scale,
        };

        let painter = ui.painter().with_clip_rect(viewport);
        let canvas_rect = Rect::from_min_size(transform.origin, canvas_size);
        painter.rect_filled(canvas_rect, egui::CornerRadius::ZERO, Color32::WHITE);

        for shape in doc.shapes() {
            let rect = Rect::from_min_size(
                transform.to_screen(Pos2::new(shape.x, shape.y)),
                Vec2::new(shape.width, shape.height) * fit_scale,
            );
            let fill = parse_color(&shape.fill).unwrap_or(Color32::TRANSPARENT);
            let stroke = match parse_color(&shape.stroke) {
                Some(color) => Stroke::new(shape.stroke_width * fit_scale, color),
                None => Stroke::NONE,
            };
            painter.rect(rect, egui::CornerRadius::ZERO, fill, stroke, StrokeKind::Inside);
        }

        let cursor_surface_pos = response
            .interact_pointer_pos()
            .or_else(|| response.hover_pos())
            .and_then(|screen| {
                let pos = transform.to_surface(screen);
                let inside =
                    pos.x >= 0.0 && pos.y >= 0.0 && pos.x <= doc_size.x && pos.y <= doc_size.y;
                inside.then_some(pos)
            });

        InnerResponse {
            inner: Some(SurfaceInteraction {
                transform,
                cursor_surface_pos,
            }),
            response,
        }
    }
}

/// Resolves an SVG color attribute. `none` renders nothing; unknown names
/// fall back to black like a permissive renderer.
fn parse_color(value: &str) -> Option<Color32> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("none") {
        return None;
    }
    if let Some(hex) = value.strip_prefix('#') {
        return Some(parse_hex(hex).unwrap_or(Color32::BLACK));
    }
    Some(match value.to_ascii_lowercase().as_str() {
        "white" => Color32::WHITE,
        "red" => Color32::RED,
        "green" => Color32::GREEN,
        "blue" => Color32::BLUE,
        "yellow" => Color32::YELLOW,
        "gray" | "grey" => Color32::GRAY,
        _ => Color32::BLACK,
    })
}

fn parse_hex(hex: &str) -> Option<Color32> {
    let channel = |r: std::ops::Range<usize>| u8::from_str_radix(hex.get(r)?, 16).ok();
    match hex.len() {
        6 => Some(Color32::from_rgb(
            channel(0..2)?,
            channel(2..4)?,
            channel(4..6)?,
        )),
        3 => {
            // #abc expands to #aabbcc
            let expand = |i: usize| {
                u8::from_str_radix(hex.get(i..i + 1)?, 16)
                    .ok()
                    .map(|c| c << 4 | c)
            };
            Some(Color32::from_rgb(expand(0)?, expand(1)?, expand(2)?))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_means_no_paint() {
        assert_eq!(parse_color("none"), None);
        assert_eq!(parse_color("NONE"), None);
    }

    #[test]
    fn named_and_hex_colors() {
        assert_eq!(parse_color("black"), Some(Color32::BLACK));
        assert_eq!(parse_color("white"), Some(Color32::WHITE));
        assert_eq!(parse_color("#ff0000"), Some(Color32::from_rgb(255, 0, 0)));
        assert_eq!(parse_color("#abc"), Some(Color32::from_rgb(0xaa, 0xbb, 0xcc)));
    }

    #[test]
    fn unknown_names_render_black() {
        assert_eq!(parse_color("mauve-ish"), Some(Color32::BLACK));
    }

    #[test]
    fn transform_round_trips() {
        let transform = SurfaceTransform {
            origin: Pos2::new(100.0, 50.0),
            scale: 0.5,
        };
        let surface = Pos2::new(40.0, 80.0);
        let screen = transform.to_screen(surface);
        assert_eq!(screen, Pos2::new(120.0, 90.0));
        assert_eq!(transform.to_surface(screen), surface);
    }
}

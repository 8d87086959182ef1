use std::{io, sync::Arc};

use egui_canvas::{number_attr, RectShape, SurfaceDocument};
use futures::future::BoxFuture;

pub mod file;
pub mod http;
pub mod in_memory;

pub use file::FileStore;
pub use http::HttpStore;
pub use in_memory::InMemoryStore;

/// Identifier of one drawable surface, derived from the final segment of
/// its source URL or path.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Debug, Hash)]
pub struct SurfaceId(Arc<str>);

impl SurfaceId {
    pub fn from_source(source: &str) -> Self {
        let id = source.rsplit('/').next().unwrap_or(source);
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug)]
pub struct SurfaceListItem {
    pub id: SurfaceId,
    pub name: String,
}

impl SurfaceListItem {
    pub fn from_source(source: &str) -> Self {
        let id = SurfaceId::from_source(source);
        let name = id.as_str().trim_end_matches(".svg").to_string();
        Self { id, name }
    }
}

#[derive(Debug)]
pub struct SurfaceData {
    pub id: SurfaceId,
    pub doc: SurfaceDocument,
}

pub trait SurfaceStore {
    fn list_surfaces(&self) -> BoxFuture<'static, io::Result<Vec<SurfaceListItem>>>;
    fn load_surface(&self, id: &SurfaceId) -> BoxFuture<'static, io::Result<SurfaceData>>;
    fn create_surface(&self, width: u32, height: u32) -> BoxFuture<'static, io::Result<SurfaceId>>;
    /// Persists one finalized shape. The caller treats this as fire and
    /// forget: the surface on screen is never rolled back on failure.
    fn add_shape(&self, id: SurfaceId, shape: RectShape) -> BoxFuture<'static, io::Result<()>>;
}

/// The form fields of one persisted shape record, in wire order.
pub fn shape_form_fields(id: &SurfaceId, shape: &RectShape) -> Vec<(&'static str, String)> {
    vec![
        ("svg_id", id.as_str().to_string()),
        ("shape", "rect".to_string()),
        ("x", number_attr(shape.x)),
        ("y", number_attr(shape.y)),
        ("width", number_attr(shape.width)),
        ("height", number_attr(shape.height)),
        ("fill", shape.fill.clone()),
        ("stroke", shape.stroke.clone()),
        ("stroke_width", number_attr(shape.stroke_width)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_is_the_last_path_segment() {
        assert_eq!(
            SurfaceId::from_source("/images/abc123.svg").as_str(),
            "abc123.svg"
        );
        assert_eq!(
            SurfaceId::from_source("http://localhost:8000/static/x.svg").as_str(),
            "x.svg"
        );
        assert_eq!(SurfaceId::from_source("plain.svg").as_str(), "plain.svg");
    }

    #[test]
    fn form_fields_match_the_wire_format() {
        let id = SurfaceId::from_source("/images/abc123.svg");
        let mut shape = RectShape::drag_default(50.0, 40.0);
        shape.width = 70.0;
        shape.height = 40.0;

        let fields = shape_form_fields(&id, &shape);
        let lookup = |name: &str| {
            fields
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(lookup("svg_id"), Some("abc123.svg"));
        assert_eq!(lookup("shape"), Some("rect"));
        assert_eq!(lookup("x"), Some("50"));
        assert_eq!(lookup("y"), Some("40"));
        assert_eq!(lookup("width"), Some("70"));
        assert_eq!(lookup("height"), Some("40"));
        assert_eq!(lookup("fill"), Some("none"));
        assert_eq!(lookup("stroke"), Some("black"));
        assert_eq!(lookup("stroke_width"), Some("2"));
    }
}

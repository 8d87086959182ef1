use std::{
    collections::HashMap,
    io,
    sync::{Arc, Mutex},
};

use egui_canvas::{RectShape, SurfaceDocument};
use futures::{future::BoxFuture, FutureExt};
use itertools::Itertools;

use super::{SurfaceData, SurfaceId, SurfaceListItem, SurfaceStore};

pub struct InMemoryStore {
    data: Arc<Mutex<HashMap<SurfaceId, SurfaceDocument>>>,
}

impl InMemoryStore {
    pub fn new(surfaces: impl IntoIterator<Item = (SurfaceId, SurfaceDocument)>) -> Self {
        Self {
            data: Arc::new(Mutex::new(surfaces.into_iter().collect())),
        }
    }

    /// A couple of pre-drawn canvases for running without any backend.
    pub fn samples() -> Self {
        let mut sketch = SurfaceDocument::new_canvas(800, 600);
        let mut frame = RectShape::drag_default(100.0, 100.0);
        frame.width = 200.0;
        frame.height = 120.0;
        sketch.append_rect(frame);

        Self::new([
            (SurfaceId::from_source("sketch.svg"), sketch),
            (
                SurfaceId::from_source("blank.svg"),
                SurfaceDocument::new_canvas(640, 480),
            ),
        ])
    }

    /// Readback for tests.
    pub fn document(&self, id: &SurfaceId) -> Option<SurfaceDocument> {
        self.data.lock().unwrap().get(id).cloned()
    }
}

impl SurfaceStore for InMemoryStore {
    fn list_surfaces(&self) -> BoxFuture<'static, io::Result<Vec<SurfaceListItem>>> {
        let data = self.data.lock().unwrap();
        let result = data
            .keys()
            .map(|id| SurfaceListItem::from_source(id.as_str()))
            .sorted_unstable_by(|a, b| a.name.cmp(&b.name))
            .collect();
        std::future::ready(Ok(result)).boxed()
    }

    fn load_surface(&self, id: &SurfaceId) -> BoxFuture<'static, io::Result<SurfaceData>> {
        let id = id.clone();
        let data = self
            .data
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .map(|doc| SurfaceData {
                id: id.clone(),
                doc,
            })
            .ok_or_else(|| io::Error::other(format!("Unknown surface_id {id:?}")));
        std::future::ready(data).boxed()
    }

    fn create_surface(&self, width: u32, height: u32) -> BoxFuture<'static, io::Result<SurfaceId>> {
        let id = SurfaceId::from_source(&format!("{}.svg", uuid::Uuid::new_v4()));
        self.data
            .lock()
            .unwrap()
            .insert(id.clone(), SurfaceDocument::new_canvas(width, height));
        std::future::ready(Ok(id)).boxed()
    }

    fn add_shape(&self, id: SurfaceId, shape: RectShape) -> BoxFuture<'static, io::Result<()>> {
        // Like the server's editor, an unknown id starts a fresh document.
        self.data
            .lock()
            .unwrap()
            .entry(id)
            .or_insert_with(|| SurfaceDocument::new_canvas(800, 600))
            .append_rect(shape);
        std::future::ready(Ok(())).boxed()
    }
}

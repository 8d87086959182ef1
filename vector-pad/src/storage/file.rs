use std::{
    io,
    path::{Path, PathBuf},
};

use egui_canvas::{RectShape, SurfaceDocument};
use futures::{future::BoxFuture, FutureExt};
use itertools::Itertools;
use log::info;

use super::{SurfaceData, SurfaceId, SurfaceListItem, SurfaceStore};

/// Directory of `.svg` files, mutated the way the server's vector editor
/// mutates them: parse, append the rect, rewrite the whole file.
pub struct FileStore {
    base: PathBuf,
}

impl FileStore {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    fn surface_path(&self, id: &SurfaceId) -> PathBuf {
        self.base.join(id.as_str())
    }

    fn list_blocking(base: PathBuf) -> io::Result<Vec<SurfaceListItem>> {
        Ok(std::fs::read_dir(base)?
            .filter_map(|entry| {
                let path = entry.ok()?.path();
                if path.extension()? != "svg" {
                    return None;
                }
                Some(SurfaceListItem::from_source(path.to_str()?))
            })
            .sorted_unstable_by(|a, b| a.name.cmp(&b.name))
            .collect())
    }

    fn read_document(path: &Path) -> io::Result<SurfaceDocument> {
        let text = std::fs::read_to_string(path)?;
        SurfaceDocument::parse_svg(&text).map_err(io::Error::other)
    }
}

impl SurfaceStore for FileStore {
    fn list_surfaces(&self) -> BoxFuture<'static, io::Result<Vec<SurfaceListItem>>> {
        let (tx, rx) = futures::channel::oneshot::channel();
        let base = self.base.clone();
        std::thread::spawn(move || {
            let _ = tx.send(Self::list_blocking(base));
        });
        async move { rx.await.map_err(io::Error::other).and_then(|r| r) }.boxed()
    }

    fn load_surface(&self, id: &SurfaceId) -> BoxFuture<'static, io::Result<SurfaceData>> {
        let id = id.clone();
        let path = self.surface_path(&id);
        async move {
            let doc = Self::read_document(&path)?;
            Ok(SurfaceData { id, doc })
        }
        .boxed()
    }

    fn create_surface(&self, width: u32, height: u32) -> BoxFuture<'static, io::Result<SurfaceId>> {
        let id = SurfaceId::from_source(&format!("{}.svg", uuid::Uuid::new_v4()));
        let path = self.surface_path(&id);
        async move {
            info!("Create canvas at: {path:?}");
            let doc = SurfaceDocument::new_canvas(width, height);
            std::fs::write(&path, doc.to_svg())?;
            Ok(id)
        }
        .boxed()
    }

    fn add_shape(&self, id: SurfaceId, shape: RectShape) -> BoxFuture<'static, io::Result<()>> {
        let path = self.surface_path(&id);
        async move {
            info!("Store shape at: {path:?}");
            // Missing files behave like the server's editor: start from an
            // empty default canvas instead of failing.
            let mut doc = match Self::read_document(&path) {
                Ok(doc) => doc,
                Err(e) if e.kind() == io::ErrorKind::NotFound => SurfaceDocument::new_canvas(800, 600),
                Err(e) => return Err(e),
            };
            doc.append_rect(shape);
            std::fs::write(&path, doc.to_svg())?;
            Ok(())
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui_canvas::AsyncTask;

    fn poll_now<T>(future: BoxFuture<'static, T>) -> T {
        let mut task = AsyncTask::new(future);
        loop {
            if let Some(value) = task.data() {
                return value;
            }
            std::thread::yield_now();
        }
    }

    fn temp_store(tag: &str) -> FileStore {
        let dir = std::env::temp_dir().join(format!("vector-pad-{tag}-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        FileStore::new(dir)
    }

    #[test]
    fn created_canvas_shows_up_in_listing() {
        let store = temp_store("list");
        let id = poll_now(store.create_surface(640, 480)).unwrap();

        let listed = poll_now(store.list_surfaces()).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, id);

        let data = poll_now(store.load_surface(&id)).unwrap();
        assert_eq!((data.doc.width(), data.doc.height()), (640, 480));
        assert!(data.doc.shapes().is_empty());
    }

    #[test]
    fn add_shape_survives_a_reload() {
        let store = temp_store("add");
        let id = poll_now(store.create_surface(800, 600)).unwrap();

        let mut shape = RectShape::drag_default(50.0, 40.0);
        shape.width = 70.0;
        shape.height = 40.0;
        poll_now(store.add_shape(id.clone(), shape.clone())).unwrap();

        let data = poll_now(store.load_surface(&id)).unwrap();
        assert_eq!(data.doc.shapes(), std::slice::from_ref(&shape));
    }

    #[test]
    fn unknown_surface_starts_from_a_default_canvas() {
        let store = temp_store("missing");
        let id = SurfaceId::from_source("fresh.svg");
        poll_now(store.add_shape(id.clone(), RectShape::drag_default(1.0, 2.0))).unwrap();

        let data = poll_now(store.load_surface(&id)).unwrap();
        assert_eq!(data.doc.shapes().len(), 1);
        assert_eq!((data.doc.width(), data.doc.height()), (800, 600));
    }
}

use std::{
    io,
    sync::{Arc, Mutex},
};

use egui_canvas::{RectShape, SurfaceDocument};
use futures::{future::BoxFuture, FutureExt};
use log::debug;

use super::{shape_form_fields, SurfaceData, SurfaceId, SurfaceListItem, SurfaceStore};

/// Store speaking the editor server's wire protocol: multipart POSTs for
/// mutations, raw SVG downloads for loads. The server exposes no listing
/// endpoint, so the known surfaces are seeded from configured source URLs
/// and grow as canvases are created.
pub struct HttpStore {
    base_url: String,
    sources: Arc<Mutex<Vec<String>>>,
    client: reqwest::blocking::Client,
}

#[derive(serde::Deserialize)]
struct SaveResponse {
    status: String,
}

/// The server signals success with `{"status": "ok"}`; anything else is a
/// rejected save.
fn save_outcome(status: &str) -> io::Result<()> {
    if status == "ok" {
        Ok(())
    } else {
        Err(io::Error::other(format!(
            "server rejected shape: status {status:?}"
        )))
    }
}

impl HttpStore {
    pub fn new(base_url: impl Into<String>, sources: Vec<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            sources: Arc::new(Mutex::new(sources)),
            client: reqwest::blocking::Client::new(),
        }
    }

    /// Blocking requests run on their own thread; the result comes back
    /// over a oneshot channel so the returned future completes under the
    /// frame loop's noop-waker polling.
    fn request<T: Send + 'static>(
        work: impl FnOnce() -> io::Result<T> + Send + 'static,
    ) -> BoxFuture<'static, io::Result<T>> {
        let (tx, rx) = futures::channel::oneshot::channel();
        std::thread::spawn(move || {
            let _ = tx.send(work());
        });
        async move { rx.await.map_err(io::Error::other).and_then(|r| r) }.boxed()
    }
}

impl SurfaceStore for HttpStore {
    fn list_surfaces(&self) -> BoxFuture<'static, io::Result<Vec<SurfaceListItem>>> {
        let sources = self.sources.clone();
        async move {
            let sources = sources.lock().map_err(|_| io::Error::other("poisoned"))?;
            Ok(sources
                .iter()
                .map(|source| SurfaceListItem::from_source(source))
                .collect())
        }
        .boxed()
    }

    fn load_surface(&self, id: &SurfaceId) -> BoxFuture<'static, io::Result<SurfaceData>> {
        let id = id.clone();
        let client = self.client.clone();
        let url = format!("{}/vector/download/{}", self.base_url, id);
        Self::request(move || {
            debug!("GET {url}");
            let text = client
                .get(&url)
                .send()
                .and_then(|r| r.error_for_status())
                .and_then(|r| r.text())
                .map_err(io::Error::other)?;
            let doc = SurfaceDocument::parse_svg(&text).map_err(io::Error::other)?;
            Ok(SurfaceData { id, doc })
        })
    }

    fn create_surface(&self, width: u32, height: u32) -> BoxFuture<'static, io::Result<SurfaceId>> {
        let client = self.client.clone();
        let sources = self.sources.clone();
        let url = format!("{}/vector/new", self.base_url);
        Self::request(move || {
            let form = reqwest::blocking::multipart::Form::new()
                .text("width", width.to_string())
                .text("height", height.to_string())
                .text("units", "px");
            debug!("POST {url} ({width}x{height})");
            let response = client
                .post(&url)
                .multipart(form)
                .send()
                .and_then(|r| r.error_for_status())
                .map_err(io::Error::other)?;
            // The server answers with a redirect to /vector?svg_id=<id>;
            // after following it the id sits in the final URL's query.
            let svg_id = response
                .url()
                .query_pairs()
                .find(|(key, _)| key == "svg_id")
                .map(|(_, value)| value.to_string())
                .ok_or_else(|| io::Error::other("create response carries no svg_id"))?;
            if let Ok(mut sources) = sources.lock() {
                sources.push(svg_id.clone());
            }
            Ok(SurfaceId::from_source(&svg_id))
        })
    }

    fn add_shape(&self, id: SurfaceId, shape: RectShape) -> BoxFuture<'static, io::Result<()>> {
        let client = self.client.clone();
        let url = format!("{}/vector/add-shape", self.base_url);
        Self::request(move || {
            let mut form = reqwest::blocking::multipart::Form::new();
            for (name, value) in shape_form_fields(&id, &shape) {
                form = form.text(name, value);
            }
            debug!("POST {url} svg_id={id}");
            let response: SaveResponse = client
                .post(&url)
                .multipart(form)
                .send()
                .and_then(|r| r.json())
                .map_err(io::Error::other)?;
            save_outcome(&response.status)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_status_is_success() {
        save_outcome("ok").unwrap();
    }

    #[test]
    fn any_other_status_is_an_error() {
        let err = save_outcome("error").unwrap_err();
        assert!(err.to_string().contains("error"));
        save_outcome("").unwrap_err();
    }

    #[test]
    fn trailing_slash_in_base_url_is_tolerated() {
        let store = HttpStore::new("http://localhost:8000/", Vec::new());
        assert_eq!(store.base_url, "http://localhost:8000");
    }
}

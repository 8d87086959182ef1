mod app;
mod config;
mod storage;

pub use app::run_native;
pub use config::Config;
pub use storage::{
    FileStore, HttpStore, InMemoryStore, SurfaceData, SurfaceId, SurfaceListItem, SurfaceStore,
};

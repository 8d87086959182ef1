use std::{io, path::PathBuf};

use eframe::egui;
use log::info;

use crate::{
    config::Config,
    storage::{FileStore, HttpStore, InMemoryStore, SurfaceStore},
};

use super::VectorPadApp;

pub fn run_native() -> eframe::Result {
    env_logger::init();

    let config: Config = match std::fs::File::open("config.json") {
        Ok(f) => serde_json::from_reader(f).map_err(|e| eframe::Error::AppCreation(Box::new(e)))?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => Config::default(),
        Err(e) => return Err(eframe::Error::AppCreation(Box::new(e))),
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size(config.egui.viewport),
        ..Default::default()
    };

    let surface_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| config.surface_dir.clone());

    let store: Box<dyn SurfaceStore> = if let Some(base_url) = &config.base_url {
        Box::new(HttpStore::new(base_url.clone(), config.surfaces.clone()))
    } else if let Some(dir) = surface_dir {
        Box::new(FileStore::new(dir))
    } else {
        Box::new(InMemoryStore::samples())
    };

    info!("Run with config: {config:?}");
    eframe::run_native(
        "Vector Pad",
        options,
        Box::new(move |cc| Ok(Box::new(VectorPadApp::new(cc, store, config.canvas_size)))),
    )
}

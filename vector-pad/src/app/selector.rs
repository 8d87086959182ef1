use std::io;

use egui::{self, ComboBox};
use egui_canvas::AsyncTask;
use log::info;

use crate::storage::{SurfaceId, SurfaceListItem, SurfaceStore};

const ICON_RELOAD: &str = "\u{21BB}";

type SurfaceListTask = AsyncTask<io::Result<Vec<SurfaceListItem>>>;

pub(crate) struct SurfaceSelector {
    idx: usize,
    values: io::Result<Vec<SurfaceListItem>>,
    loader: Option<SurfaceListTask>,
    pending_idx: Option<usize>,
}

impl SurfaceSelector {
    pub fn new(loader: Option<SurfaceListTask>) -> Self {
        Self {
            idx: 0,
            values: Ok(Vec::new()),
            loader,
            pending_idx: None,
        }
    }

    pub fn update(&mut self) {
        if let Some(loader) = self.loader.as_mut() {
            if let Some(values) = loader.data() {
                info!("Reloaded {:?} surfaces", values.as_ref().map(Vec::len));
                self.loader = None;
                self.values = values;
                self.pending_idx = self
                    .values
                    .as_ref()
                    .ok()
                    .and_then(|x| (!x.is_empty()).then_some(0));
            }
        }
    }

    pub fn reload(&mut self, store: &dyn SurfaceStore) {
        self.loader = Some(AsyncTask::new(store.list_surfaces()));
    }

    pub fn is_loading(&self) -> bool {
        self.loader.is_some()
    }

    pub fn current(&self) -> Option<&SurfaceId> {
        self.values.as_ref().ok()?.get(self.idx).map(|x| &x.id)
    }

    /// Returns a SurfaceId when the selection changed and has to be loaded.
    pub fn ui(&mut self, store: &dyn SurfaceStore, ui: &mut egui::Ui) -> Option<SurfaceId> {
        let mut changed = self.pending_idx.take();

        match &mut self.values {
            Err(e) => {
                ui.label(format!("{e}"));
            }
            Ok(items) => {
                if ComboBox::from_id_salt("surface_selector")
                    .show_index(ui, &mut self.idx, items.len(), |x| {
                        items.get(x).map(|x| x.name.as_str()).unwrap_or("")
                    })
                    .changed()
                {
                    changed = Some(self.idx);
                }
                if ui
                    .button(ICON_RELOAD)
                    .on_hover_text("Reload surfaces")
                    .clicked()
                {
                    self.reload(store);
                }
            }
        }
        changed.and_then(|x| Some(self.values.as_ref().ok()?.get(x)?.id.clone()))
    }
}

use egui_canvas::AsyncTask;
use log::{debug, error, info};

use super::SurfaceState;

const ICON_RECT: &str = "\u{25AD}";
const ICON_NEW: &str = "\u{2795}";

impl crate::app::VectorPadApp {
    pub(super) fn menu_ui(&mut self, ui: &mut egui::Ui) {
        self.selector.update();
        self.poll_create_job();

        ui.horizontal(|ui| {
            if let Some(id) = self.selector.ui(&*self.store, ui) {
                // Surface swap: the tool has to be re-armed against the
                // freshly loaded surface.
                debug!("Switching to surface {id}");
                self.surface_state = SurfaceState::NotLoaded;
                self.armed = false;
            }

            if ui
                .selectable_label(self.armed, ICON_RECT)
                .on_hover_text("Rectangle tool")
                .clicked()
            {
                super::arm_on_click(&mut self.armed, &self.surface_state);
            }

            if ui
                .button(ICON_NEW)
                .on_hover_text("New canvas")
                .clicked()
                && self.create_job.is_none()
            {
                let [width, height] = self.canvas_size;
                self.create_job = Some(AsyncTask::new(self.store.create_surface(width, height)));
            }
        });
    }

    fn poll_create_job(&mut self) {
        let Some(job) = self.create_job.as_mut() else {
            return;
        };
        if let Some(result) = job.data() {
            self.create_job = None;
            match result {
                Ok(id) => {
                    info!("Created canvas {id}");
                    self.selector.reload(&*self.store);
                }
                Err(e) => error!("Failed to create canvas: {e}"),
            }
        }
    }
}

use std::io;

use egui::{self, InnerResponse, Sense, UiBuilder};
use egui_canvas::{
    AsyncTask, BoxFuture, RectTool, SurfaceInteraction, SurfaceViewer, Tool, ToolContext,
};
use log::{error, info};

use crate::storage::{SurfaceData, SurfaceStore};

mod menu;
mod native;
mod selector;

pub use native::run_native;
pub(crate) use selector::SurfaceSelector;

pub(crate) struct VectorPadApp {
    store: Box<dyn SurfaceStore>,
    selector: SurfaceSelector,
    viewer: SurfaceViewer,
    surface_state: SurfaceState,
    tool: RectTool,
    /// Whether the rect tool's drag listeners are attached to the surface.
    armed: bool,
    save_jobs: Vec<AsyncTask<io::Result<()>>>,
    create_job: Option<AsyncTask<io::Result<crate::storage::SurfaceId>>>,
    canvas_size: [u32; 2],
}

enum SurfaceState {
    NotLoaded,
    Loading(AsyncTask<io::Result<SurfaceData>>),
    Loaded(SurfaceData),
    Error(String),
}

/// A tool click only arms against a fully loaded surface. A click while
/// the surface is still loading is dropped with a debug log; it is never
/// applied retroactively once the load finishes.
fn arm_on_click(armed: &mut bool, state: &SurfaceState) {
    if matches!(state, SurfaceState::Loaded(_)) {
        *armed = true;
        info!("Rect tool armed");
    } else {
        log::debug!("Rect tool clicked before surface load; ignored");
    }
}

impl SurfaceState {
    fn update(&mut self, loader: &dyn Fn() -> BoxFuture<'static, io::Result<SurfaceData>>) {
        match self {
            SurfaceState::NotLoaded => *self = SurfaceState::Loading(AsyncTask::new(loader())),
            SurfaceState::Loading(task) => {
                if let Some(result) = task.data() {
                    *self = match result {
                        Ok(data) => {
                            info!("Surface {} loaded", data.id);
                            SurfaceState::Loaded(data)
                        }
                        Err(e) => SurfaceState::Error(format!("{e}")),
                    };
                }
            }
            SurfaceState::Loaded(_) | SurfaceState::Error(_) => {}
        }
    }
}

impl VectorPadApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        store: Box<dyn SurfaceStore>,
        canvas_size: [u32; 2],
    ) -> Self {
        let loader = Some(AsyncTask::new(store.list_surfaces()));
        Self {
            store,
            selector: SurfaceSelector::new(loader),
            viewer: SurfaceViewer::default(),
            surface_state: SurfaceState::NotLoaded,
            tool: RectTool::default(),
            armed: false,
            save_jobs: Vec::new(),
            create_job: None,
            canvas_size,
        }
    }

    fn handle_surface_transition(&mut self) {
        let Some(id) = self.selector.current() else {
            return;
        };
        let id = id.clone();
        let store = self.store.as_ref();
        self.surface_state.update(&|| store.load_surface(&id));
    }

    /// Saves are fire and forget: each job is polled until it resolves and
    /// only the outcome is logged. The drawn rect is never rolled back.
    fn poll_save_jobs(&mut self) {
        self.save_jobs.retain_mut(|job| match job.data() {
            Some(Ok(())) => {
                info!("Shape saved successfully");
                false
            }
            Some(Err(e)) => {
                error!("Failed to save shape: {e}");
                false
            }
            None => true,
        });
    }

    fn has_pending_work(&self) -> bool {
        !self.save_jobs.is_empty()
            || self.create_job.is_some()
            || self.selector.is_loading()
            || matches!(self.surface_state, SurfaceState::Loading(_))
    }
}

impl eframe::App for VectorPadApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Vector pad");
            self.menu_ui(ui);
            self.handle_surface_transition();
            self.poll_save_jobs();

            match &mut self.surface_state {
                SurfaceState::Loaded(data) => {
                    let InnerResponse { inner, response } = ui.reserve_bottom_space(24.0, |ui| {
                        self.viewer.ui(ui, &data.doc, Some(Sense::click()))
                    });
                    let Some(SurfaceInteraction {
                        cursor_surface_pos, ..
                    }) = inner
                    else {
                        return;
                    };

                    // Drag events only reach the tool once it is armed.
                    if self.armed {
                        let mut finished = Vec::new();
                        self.tool.handle_interaction(ToolContext::new(
                            &mut data.doc,
                            response,
                            cursor_surface_pos,
                            &mut finished,
                        ));
                        for shape in finished {
                            self.save_jobs
                                .push(AsyncTask::new(self.store.add_shape(data.id.clone(), shape)));
                        }
                    }

                    if let Some(pos) = cursor_surface_pos {
                        ui.label(format!("({:.0}, {:.0})", pos.x, pos.y));
                    }
                }
                SurfaceState::Error(e) => {
                    ui.label(format!("Error: {e}"));
                }
                SurfaceState::NotLoaded => {
                    ui.label("No surface selected");
                }
                SurfaceState::Loading(_) => {
                    ui.label("Loading surface\u{2026}");
                }
            }
        });

        // Nothing drives the noop-waker tasks while the UI is idle, so
        // keep repainting until they settle.
        if self.has_pending_work() {
            ctx.request_repaint();
        }
    }
}


trait UiExt {
    fn reserve_bottom_space<T>(&mut self, size: f32, inner: impl FnOnce(&mut egui::Ui) -> T) -> T;
}

impl UiExt for egui::Ui {
    fn reserve_bottom_space<T>(&mut self, size: f32, inner: impl FnOnce(&mut egui::Ui) -> T) -> T {
        let mut available = self.available_rect_before_wrap();
        available.max.y = (available.max.y - size).max(0.);

        let InnerResponse { inner, .. } =
            self.allocate_new_ui(UiBuilder::new().max_rect(available), inner);
        inner
    }
}

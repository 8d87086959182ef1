use std::path::PathBuf;

/// Read from `config.json` next to the binary; every field has a default
/// so a missing file means a runnable app.
#[derive(serde::Deserialize, Debug)]
#[serde(default)]
pub struct Config {
    /// Editor server base URL; takes precedence over `surface_dir`.
    pub base_url: Option<String>,
    /// Directory of `.svg` files to edit locally.
    pub surface_dir: Option<PathBuf>,
    /// Known surface source URLs when talking to a server.
    pub surfaces: Vec<String>,
    /// Size of newly created canvases.
    pub canvas_size: [u32; 2],
    pub egui: EguiConfig,
}

#[derive(serde::Deserialize, Debug)]
#[serde(default)]
pub struct EguiConfig {
    pub viewport: [f32; 2],
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: None,
            surface_dir: None,
            surfaces: Vec::new(),
            canvas_size: [800, 600],
            egui: Default::default(),
        }
    }
}

impl Default for EguiConfig {
    fn default() -> Self {
        Self {
            viewport: [1024.0, 768.0],
        }
    }
}

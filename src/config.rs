//! Startup configuration.

use std::path::PathBuf;

use crate::gfx::camera::{InteractionSettings, ViewParams};
use crate::gfx::rendering::ShadingMode;
use crate::gfx::scene::Controls;

/// Everything the viewer needs before the window opens.
///
/// ```
/// use heightview::ViewerConfig;
///
/// let config = ViewerConfig::default()
///     .with_window_size(800, 600)
///     .with_height_percent(150.0);
/// assert_eq!(config.controls.height_exaggeration(), 1.5);
/// ```
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub vsync: bool,
    /// Loaded as soon as the window is up
    pub initial_file: Option<PathBuf>,
    pub shading_mode: ShadingMode,
    pub controls: Controls,
    pub view: ViewParams,
    pub interaction: InteractionSettings,
    pub clear_color: [f64; 3],
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "heightview".to_string(),
            window_width: 1200,
            window_height: 800,
            vsync: true,
            initial_file: None,
            shading_mode: ShadingMode::PhongLit,
            controls: Controls::default(),
            view: ViewParams::default(),
            interaction: InteractionSettings::default(),
            clear_color: [0.05, 0.05, 0.08],
        }
    }
}

impl ViewerConfig {
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_owned();
        self
    }

    /// Zero dimensions are raised to 1.
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_width = width.max(1);
        self.window_height = height.max(1);
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    pub fn with_initial_file(mut self, path: Option<PathBuf>) -> Self {
        self.initial_file = path;
        self
    }

    pub fn with_shading_mode(mut self, mode: ShadingMode) -> Self {
        self.shading_mode = mode;
        self
    }

    pub fn with_height_percent(mut self, percent: f32) -> Self {
        self.controls.height_percent = percent;
        self
    }

    pub fn clear_color(&self) -> wgpu::Color {
        let [r, g, b] = self.clear_color;
        wgpu::Color { r, g, b, a: 1.0 }
    }
}

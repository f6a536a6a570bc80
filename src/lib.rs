//! heightview
//!
//! Interactive heightmap viewer built on wgpu and winit. Loads a raster image
//! or a raw square grid of little-endian `f32` samples, triangulates it into a
//! lit surface and lets the user orbit, pan and zoom it.

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod ingest;
pub mod ui;
pub mod wgpu_utils;

pub use app::HeightviewApp;
pub use config::ViewerConfig;
pub use error::{HeightviewError, Result};

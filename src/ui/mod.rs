//! # User Interface
//!
//! Dear ImGui overlay drawn after the heightmap pass.
//!
//! - [`UiManager`] - ImGui context, winit input glue and the wgpu renderer
//! - [`control_panel`] - shading mode, height, light and wireframe controls,
//!   file opening, view reset and load status
//!
//! Pointer input the UI wants is not forwarded to the model controls.

pub mod manager;
pub mod panel;

pub use manager::UiManager;
pub use panel::{control_panel, PanelAction};

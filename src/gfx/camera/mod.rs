//! # Camera
//!
//! The viewer uses a static camera; all user manipulation lives in the model
//! transform.
//!
//! - [`interaction`] - pointer/wheel event reducer
//! - [`controller`] - winit event translation
//! - [`transform`] - model, view and projection matrices

pub mod controller;
pub mod interaction;
pub mod transform;

pub use controller::PointerController;
pub use interaction::{InteractionSettings, InteractionState, PointerEvent};
pub use transform::{compute_matrices, FrameMatrices, ViewParams};

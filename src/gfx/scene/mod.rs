//! # Scene
//!
//! The state a frame is drawn from, and the vertex format it is uploaded as.
//!
//! - [`RenderState`] - current mesh, interaction state, shading mode and
//!   user controls
//! - [`Vertex3D`] - interleaved position and normal

pub mod render_state;
pub mod vertex;

pub use render_state::{Controls, LoadStatus, RenderState};
pub use vertex::Vertex3D;

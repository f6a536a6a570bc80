//! # Graphics
//!
//! Everything between a finished [`Mesh`](geometry::Mesh) and pixels on
//! screen.
//!
//! - **Geometry** ([`geometry`]) - heightfield triangulation and normals
//! - **Camera** ([`camera`]) - pointer interaction and the model/view/projection
//!   matrices
//! - **Rendering** ([`rendering`]) - the wgpu engine, pipelines and the two
//!   shading programs
//! - **Scene** ([`scene`]) - per-frame render state and the vertex format
//! - **Resources** ([`resources`]) - depth buffer

pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;

pub use rendering::render_engine::RenderEngine;

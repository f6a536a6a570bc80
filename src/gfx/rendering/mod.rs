//! Pipelines, shading programs and the frame driver.

pub mod frame;
pub mod gpu_mesh;
pub mod pipeline_manager;
pub mod render_engine;
pub mod shading;

pub use frame::{prepare_draw, DrawRequest};
pub use gpu_mesh::{DrawMesh, GpuMesh};
pub use pipeline_manager::{PipelineConfig, PipelineManager};
pub use render_engine::RenderEngine;
pub use shading::{NormalProgram, PhongProgram, ShadingMode, ShadingProgram, ShadingPrograms, ShadingUniform};

//! # Vertex Format
//!
//! GPU vertex layout shared by both shading pipelines.

/// Surface vertex: position and smooth normal.
///
/// `#[repr(C)]` keeps the layout stable for `bytemuck` casts into vertex
/// buffers.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3D {
    /// Model-space position [x, y, z]
    pub position: [f32; 3],
    /// Accumulated vertex normal [nx, ny, nz]
    pub normal: [f32; 3],
}

impl Vertex3D {
    /// Buffer layout with the position at shader location 0 and the normal at
    /// location 1, matching `vs_main` in both shaders.
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<Vertex3D>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

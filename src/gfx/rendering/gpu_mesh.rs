use wgpu::util::DeviceExt;

use crate::gfx::geometry::{BufferSizes, Mesh};
use crate::gfx::scene::vertex::Vertex3D;

/// Vertex and index buffers for the mesh currently on screen.
pub struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    /// Scene generation the buffers were uploaded from
    generation: u64,
}

impl GpuMesh {
    /// Uploads `mesh`. Returns `None` for a mesh with nothing to draw, since
    /// zero-sized buffers cannot be bound, or one larger than the device's
    /// buffer limit.
    pub fn upload(device: &wgpu::Device, mesh: &Mesh, generation: u64) -> Option<Self> {
        if !mesh.is_drawable() {
            return None;
        }

        let sizes = BufferSizes {
            vertex: (mesh.vertex_count() * std::mem::size_of::<Vertex3D>()) as u64,
            index: (mesh.indices.len() * std::mem::size_of::<u32>()) as u64,
        };
        let limit = device.limits().max_buffer_size;
        if sizes.largest() > limit {
            log::error!(
                "Mesh generation {} needs a {} byte buffer, device limit is {}",
                generation,
                sizes.largest(),
                limit
            );
            return None;
        }

        let vertices = mesh.to_vertices();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Heightmap Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Heightmap Index Buffer"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        log::debug!(
            "Uploaded mesh generation {}: {} vertices, {} indices",
            generation,
            vertices.len(),
            mesh.indices.len()
        );

        Some(Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
            generation,
        })
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

pub trait DrawMesh<'a> {
    fn draw_mesh(&mut self, mesh: &'a GpuMesh);
}

impl<'a, 'b> DrawMesh<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_mesh(&mut self, mesh: &'b GpuMesh) {
        self.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        self.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..mesh.index_count, 0, 0..1);
    }
}

//! # Heightmap Geometry
//!
//! Converts a [`HeightField`](crate::ingest::HeightField) into a single indexed
//! triangle mesh with smooth per-vertex normals.
//!
//! ## Usage
//!
//! ```rust
//! use heightview::gfx::geometry;
//! use heightview::ingest::HeightField;
//!
//! let field = HeightField::new(vec![0.0, 1.0, 1.0, 0.0], 2, 2, Some([0.0, 1.0]));
//! let mesh = geometry::build(&field);
//!
//! assert_eq!(mesh.vertex_count(), 4);
//! assert_eq!(mesh.triangle_count(), 2);
//! ```

pub mod heightmap;

pub use heightmap::build;

use crate::error::{HeightviewError, Result};
use crate::gfx::scene::vertex::Vertex3D;

/// Geometry ready for GPU upload.
///
/// `positions` and `normals` are parallel arrays; `indices` holds triangles as
/// consecutive triples. A mesh is never edited once built: a reload produces a
/// new one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions (x, y, z)
    pub positions: Vec<[f32; 3]>,
    /// Unit normals, or zero for vertices no triangle touches
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Whether there is anything to draw.
    pub fn is_drawable(&self) -> bool {
        !self.indices.is_empty()
    }

    /// Interleaves positions and normals into the renderer's vertex format.
    pub fn to_vertices(&self) -> Vec<Vertex3D> {
        self.positions
            .iter()
            .zip(&self.normals)
            .map(|(&position, &normal)| Vertex3D { position, normal })
            .collect()
    }
}

/// Byte sizes of the vertex and index buffers a `rows x cols` grid uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferSizes {
    pub vertex: u64,
    pub index: u64,
}

impl BufferSizes {
    pub fn for_grid(rows: usize, cols: usize) -> Self {
        let (rows, cols) = (rows as u64, cols as u64);
        let vertex = rows
            .saturating_mul(cols)
            .saturating_mul(std::mem::size_of::<Vertex3D>() as u64);
        let index = if rows < 2 || cols < 2 {
            0
        } else {
            // Two triangles of three u32 indices per cell
            (rows - 1)
                .saturating_mul(cols - 1)
                .saturating_mul(6 * std::mem::size_of::<u32>() as u64)
        };
        Self { vertex, index }
    }

    pub fn largest(&self) -> u64 {
        self.vertex.max(self.index)
    }
}

/// Rejects grids whose mesh buffers would exceed the device's
/// `max_buffer_size`.
pub fn ensure_fits(rows: usize, cols: usize, max_buffer_size: u64) -> Result<()> {
    let bytes = BufferSizes::for_grid(rows, cols).largest();
    if bytes > max_buffer_size {
        return Err(HeightviewError::MeshTooLarge {
            rows,
            cols,
            bytes,
            limit: max_buffer_size,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOWNLEVEL_MAX_BUFFER_SIZE: u64 = 1 << 28;

    #[test]
    fn test_buffer_sizes_for_grid() {
        assert_eq!(
            BufferSizes::for_grid(3, 3),
            BufferSizes {
                vertex: 9 * 24,
                index: 4 * 24,
            }
        );
        assert_eq!(BufferSizes::for_grid(1, 5).index, 0);
        assert_eq!(BufferSizes::for_grid(4096, 4096).vertex, 402_653_184);
    }

    #[test]
    fn test_ensure_fits_rejects_large_grids() {
        assert!(ensure_fits(2048, 2048, DOWNLEVEL_MAX_BUFFER_SIZE).is_ok());
        assert!(ensure_fits(3344, 3344, DOWNLEVEL_MAX_BUFFER_SIZE).is_ok());

        let err = ensure_fits(3400, 3400, DOWNLEVEL_MAX_BUFFER_SIZE).unwrap_err();
        assert!(matches!(
            err,
            HeightviewError::MeshTooLarge {
                rows: 3400,
                cols: 3400,
                bytes: 277_440_000,
                limit: DOWNLEVEL_MAX_BUFFER_SIZE,
            }
        ));
        assert!(ensure_fits(4096, 4096, DOWNLEVEL_MAX_BUFFER_SIZE).is_err());
        assert!(ensure_fits(4096, 4096, 1 << 30).is_ok());
    }

    #[test]
    fn test_empty_mesh_is_not_drawable() {
        let mesh = Mesh::default();
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.triangle_count(), 0);
        assert!(!mesh.is_drawable());
    }

    #[test]
    fn test_to_vertices_interleaves() {
        let mesh = Mesh {
            positions: vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]],
            normals: vec![[0.0, 1.0, 0.0], [1.0, 0.0, 0.0]],
            indices: vec![],
        };
        let vertices = mesh.to_vertices();
        assert_eq!(vertices.len(), 2);
        assert_eq!(vertices[1].position, [4.0, 5.0, 6.0]);
        assert_eq!(vertices[1].normal, [1.0, 0.0, 0.0]);
    }
}

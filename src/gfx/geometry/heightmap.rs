//! Grid triangulation and normal accumulation for height fields.

use cgmath::{InnerSpace, Vector3, Zero};

use super::Mesh;
use crate::ingest::HeightField;

/// Normalized height used when every sample is equal.
pub const FLAT_FIELD_HEIGHT: f32 = 0.5;

/// Builds the surface mesh for `field`.
///
/// Cell `(r, c)` becomes the vertex `x = c/cols*2-1`, `z = r/rows*2-1`,
/// `y = h*2-1` where `h` is the sample normalized by the field's value range.
/// Every interior quad is split into `(i, i+cols, i+1)` and
/// `(i+1, i+cols, i+cols+1)`. Normals are the normalized sum of the unnormalized
/// face normals around each vertex, so larger faces weigh more.
///
/// Fields with fewer than two rows or columns produce vertices but no
/// triangles.
pub fn build(field: &HeightField) -> Mesh {
    let positions = vertex_positions(field);
    let indices = triangulate(field.rows(), field.cols());
    let normals = vertex_normals(&positions, &indices);

    log::info!(
        "Created {} vertices and {} triangles",
        positions.len(),
        indices.len() / 3
    );

    Mesh {
        positions,
        normals,
        indices,
    }
}

/// Maps a raw sample into `[0, 1]` using `range`, or passes it through when
/// the source is already normalized.
///
/// Non-finite raw samples sit at the bottom of the range.
pub fn normalized_height(sample: f32, range: Option<[f32; 2]>) -> f32 {
    match range {
        None => sample,
        Some(_) if !sample.is_finite() => 0.0,
        Some([min, max]) => {
            let span = max - min;
            if span > 0.0 {
                (sample - min) / span
            } else {
                FLAT_FIELD_HEIGHT
            }
        }
    }
}

fn vertex_positions(field: &HeightField) -> Vec<[f32; 3]> {
    let (rows, cols) = (field.rows(), field.cols());
    let range = field.value_range();

    let mut positions = Vec::with_capacity(rows * cols);
    for r in 0..rows {
        for c in 0..cols {
            let h = normalized_height(field.sample(r, c), range);
            positions.push([
                (c as f32 / cols as f32) * 2.0 - 1.0,
                h * 2.0 - 1.0,
                (r as f32 / rows as f32) * 2.0 - 1.0,
            ]);
        }
    }
    positions
}

fn triangulate(rows: usize, cols: usize) -> Vec<u32> {
    if rows < 2 || cols < 2 {
        return Vec::new();
    }

    let stride = cols as u32;
    let mut indices = Vec::with_capacity((rows - 1) * (cols - 1) * 6);
    for r in 0..rows - 1 {
        for c in 0..cols - 1 {
            let i = (r * cols + c) as u32;
            indices.extend_from_slice(&[i, i + stride, i + 1]);
            indices.extend_from_slice(&[i + 1, i + stride, i + stride + 1]);
        }
    }
    indices
}

fn vertex_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut accumulated = vec![Vector3::<f32>::zero(); positions.len()];

    for triangle in indices.chunks_exact(3) {
        let [a, b, c] = [
            triangle[0] as usize,
            triangle[1] as usize,
            triangle[2] as usize,
        ];
        let v0 = Vector3::from(positions[a]);
        let v1 = Vector3::from(positions[b]);
        let v2 = Vector3::from(positions[c]);

        let face_normal = (v1 - v0).cross(v2 - v0);
        accumulated[a] += face_normal;
        accumulated[b] += face_normal;
        accumulated[c] += face_normal;
    }

    accumulated
        .into_iter()
        .map(|n| normalize_or_zero(n).into())
        .collect()
}

fn normalize_or_zero(v: Vector3<f32>) -> Vector3<f32> {
    let length_squared = v.magnitude2();
    if length_squared > 0.0 {
        v / length_squared.sqrt()
    } else {
        Vector3::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn magnitude(n: [f32; 3]) -> f32 {
        (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt()
    }

    fn ramp_field(rows: usize, cols: usize) -> HeightField {
        let samples = (0..rows * cols)
            .map(|i| ((i * 7) % 11) as f32 * 0.3)
            .collect();
        HeightField::new(samples, rows, cols, Some([0.0, 3.0]))
    }

    #[test]
    fn test_counts_follow_grid_size() {
        for (rows, cols) in [(2, 2), (3, 5), (7, 4)] {
            let mesh = build(&ramp_field(rows, cols));
            assert_eq!(mesh.vertex_count(), rows * cols);
            assert_eq!(mesh.normals.len(), rows * cols);
            assert_eq!(mesh.triangle_count(), (rows - 1) * (cols - 1) * 2);
            assert_eq!(mesh.indices.len(), (rows - 1) * (cols - 1) * 6);
        }
    }

    #[test]
    fn test_indices_in_bounds() {
        let mesh = build(&ramp_field(6, 3));
        assert_eq!(mesh.indices.len() % 3, 0);
        assert!(mesh
            .indices
            .iter()
            .all(|&i| (i as usize) < mesh.vertex_count()));
    }

    #[test]
    fn test_quad_winding() {
        let indices = triangulate(2, 3);
        assert_eq!(indices, vec![0, 3, 1, 1, 3, 4, 1, 4, 2, 2, 4, 5]);
    }

    #[test]
    fn test_normals_are_unit_length() {
        let mesh = build(&ramp_field(5, 6));
        for &n in &mesh.normals {
            assert_relative_eq!(magnitude(n), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_build_is_deterministic() {
        let field = ramp_field(4, 4);
        assert_eq!(build(&field), build(&field));
    }

    #[test]
    fn test_flat_field_has_no_nan() {
        let field = HeightField::new(vec![7.0; 9], 3, 3, Some([7.0, 7.0]));
        let mesh = build(&field);
        for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
            assert!(p.iter().chain(n.iter()).all(|v| v.is_finite()));
            assert_eq!(p[1], FLAT_FIELD_HEIGHT * 2.0 - 1.0);
            assert_relative_eq!(n[1], 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_degenerate_field_builds_empty_mesh() {
        let field = HeightField::new(vec![0.1, 0.5, 0.9], 1, 3, None);
        let mesh = build(&field);
        assert_eq!(mesh.vertex_count(), 3);
        assert!(mesh.indices.is_empty());
        assert!(mesh.normals.iter().all(|&n| n == [0.0, 0.0, 0.0]));
    }

    #[test]
    fn test_positions_span_grid() {
        let field = HeightField::new(vec![0.0, 0.25, 0.5, 1.0], 2, 2, None);
        let mesh = build(&field);
        assert_eq!(mesh.positions[0], [-1.0, -1.0, -1.0]);
        assert_eq!(mesh.positions[1], [0.0, -0.5, -1.0]);
        assert_eq!(mesh.positions[2], [-1.0, 0.0, 0.0]);
        assert_eq!(mesh.positions[3], [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_saddle_normals_are_consistent() {
        let field = HeightField::new(vec![0.0, 1.0, 1.0, 0.0], 2, 2, Some([0.0, 1.0]));
        let mesh = build(&field);

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);

        // Corner vertices each see one face; the shared diagonal sees both.
        let expected = [
            [-2.0 / 3.0, 1.0 / 3.0, -2.0 / 3.0],
            [0.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
            [2.0 / 3.0, 1.0 / 3.0, 2.0 / 3.0],
        ];
        for (n, e) in mesh.normals.iter().zip(expected) {
            assert_relative_eq!(magnitude(*n), 1.0, epsilon = 1e-6);
            assert!(n[1] > 0.0);
            for axis in 0..3 {
                assert_relative_eq!(n[axis], e[axis], epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_normalized_height() {
        assert_eq!(normalized_height(0.3, None), 0.3);
        assert_eq!(normalized_height(5.0, Some([0.0, 10.0])), 0.5);
        assert_eq!(normalized_height(2.0, Some([2.0, 2.0])), FLAT_FIELD_HEIGHT);
    }

    #[test]
    fn test_non_finite_samples_sit_at_range_minimum() {
        assert_eq!(normalized_height(f32::NAN, Some([0.0, 8.0])), 0.0);
        assert_eq!(normalized_height(f32::NEG_INFINITY, Some([0.0, 8.0])), 0.0);

        let mut samples: Vec<f32> = (0..9).map(|v| v as f32).collect();
        samples[4] = f32::NAN;
        let field = HeightField::new(samples, 3, 3, Some([0.0, 8.0]));
        let mesh = build(&field);

        assert_eq!(mesh.positions[4][1], -1.0);
        for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
            assert!(p.iter().chain(n.iter()).all(|v| v.is_finite()));
            assert_relative_eq!(magnitude(*n), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_normalize_zero_stays_zero() {
        assert_eq!(normalize_or_zero(Vector3::zero()), Vector3::zero());
    }
}

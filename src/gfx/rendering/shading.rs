//! Shading programs.
//!
//! Two pipelines share the vertex layout and a single uniform block:
//!
//! - **Phong** - ambient 0.2, diffuse tint (0.6, 0.8, 1.0), white specular
//!   with exponent 16, lit by a user-steerable directional light.
//! - **Normal** - colours each vertex by its model-rotated normal,
//!   `0.5 * n + 0.5`, interpolated across the triangle.
//!
//! Each program also evaluates its colour on the CPU through
//! [`ShadingProgram::shade`], which mirrors the WGSL exactly.

use cgmath::{InnerSpace, Matrix3, Matrix4, SquareMatrix, Vector3, Zero};

use crate::gfx::camera::transform::FrameMatrices;

const AMBIENT: f32 = 0.2;
const DIFFUSE_COLOR: [f32; 3] = [0.6, 0.8, 1.0];
const SPECULAR_EXPONENT: f32 = 16.0;

/// Active shading model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadingMode {
    #[default]
    PhongLit,
    NormalVisualization,
}

impl ShadingMode {
    /// Name of the pipeline registered for this mode.
    pub fn pipeline_label(self, wireframe: bool) -> &'static str {
        match (self, wireframe) {
            (ShadingMode::PhongLit, false) => "Phong",
            (ShadingMode::PhongLit, true) => "Phong Wireframe",
            (ShadingMode::NormalVisualization, false) => "Normal",
            (ShadingMode::NormalVisualization, true) => "Normal Wireframe",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ShadingMode::PhongLit => "Phong lighting",
            ShadingMode::NormalVisualization => "Normals",
        }
    }
}

/// Uniform block bound at group 0, binding 0. Must match `Frame` in both
/// shaders.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ShadingUniform {
    pub model: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    /// xyz = normalized light direction, w unused
    pub light_dir: [f32; 4],
}
// 3 * 64 + 16 = 208 bytes

impl Default for ShadingUniform {
    fn default() -> Self {
        let identity: [[f32; 4]; 4] = Matrix4::<f32>::identity().into();
        Self {
            model: identity,
            view: identity,
            projection: identity,
            light_dir: [0.0, 1.0, 0.0, 0.0],
        }
    }
}

/// A shading pipeline configuration and its uniform state.
pub trait ShadingProgram {
    fn mode(&self) -> ShadingMode;

    fn shader_source(&self) -> &'static str;

    fn set_matrices(&mut self, matrices: &FrameMatrices);

    /// Programs without lighting ignore this.
    fn set_light_direction(&mut self, _direction: Vector3<f32>) {}

    fn uniform(&self) -> ShadingUniform;

    /// Fragment colour for a model-space `normal` at `eye_position` (view
    /// space), before clamping to the render target.
    fn shade(&self, normal: Vector3<f32>, eye_position: Vector3<f32>) -> [f32; 3];
}

/// Upper-left 3x3 of the model matrix, applied to normals.
fn model_rotation(model: &[[f32; 4]; 4]) -> Matrix3<f32> {
    let m = Matrix4::from(*model);
    Matrix3::from_cols(m.x.truncate(), m.y.truncate(), m.z.truncate())
}

fn normalize(v: Vector3<f32>) -> Vector3<f32> {
    if v.is_zero() {
        v
    } else {
        v.normalize()
    }
}

fn reflect(incident: Vector3<f32>, normal: Vector3<f32>) -> Vector3<f32> {
    incident - normal * (2.0 * normal.dot(incident))
}

fn store_matrices(uniform: &mut ShadingUniform, matrices: &FrameMatrices) {
    uniform.model = matrices.model.into();
    uniform.view = matrices.view.into();
    uniform.projection = matrices.projection.into();
}

#[derive(Debug, Default)]
pub struct PhongProgram {
    uniform: ShadingUniform,
}

impl ShadingProgram for PhongProgram {
    fn mode(&self) -> ShadingMode {
        ShadingMode::PhongLit
    }

    fn shader_source(&self) -> &'static str {
        include_str!("phong.wgsl")
    }

    fn set_matrices(&mut self, matrices: &FrameMatrices) {
        store_matrices(&mut self.uniform, matrices);
    }

    fn set_light_direction(&mut self, direction: Vector3<f32>) {
        let d = normalize(direction);
        self.uniform.light_dir = [d.x, d.y, d.z, 0.0];
    }

    fn uniform(&self) -> ShadingUniform {
        self.uniform
    }

    fn shade(&self, normal: Vector3<f32>, eye_position: Vector3<f32>) -> [f32; 3] {
        let n = normalize(model_rotation(&self.uniform.model) * normal);
        let [lx, ly, lz, _] = self.uniform.light_dir;
        let l = normalize(Vector3::new(lx, ly, lz));
        let v = normalize(-eye_position);
        let r = reflect(-l, n);

        let diffuse = n.dot(l).max(0.0);
        let specular = r.dot(v).max(0.0).powf(SPECULAR_EXPONENT);

        let mut color = [0.0; 3];
        for (channel, tint) in color.iter_mut().zip(DIFFUSE_COLOR) {
            *channel = AMBIENT + diffuse * tint + specular;
        }
        color
    }
}

#[derive(Debug, Default)]
pub struct NormalProgram {
    uniform: ShadingUniform,
}

impl ShadingProgram for NormalProgram {
    fn mode(&self) -> ShadingMode {
        ShadingMode::NormalVisualization
    }

    fn shader_source(&self) -> &'static str {
        include_str!("normal.wgsl")
    }

    fn set_matrices(&mut self, matrices: &FrameMatrices) {
        store_matrices(&mut self.uniform, matrices);
    }

    fn uniform(&self) -> ShadingUniform {
        self.uniform
    }

    fn shade(&self, normal: Vector3<f32>, _eye_position: Vector3<f32>) -> [f32; 3] {
        let n = normalize(model_rotation(&self.uniform.model) * normal);
        [0.5 * n.x + 0.5, 0.5 * n.y + 0.5, 0.5 * n.z + 0.5]
    }
}

/// Both programs, selectable by [`ShadingMode`].
#[derive(Debug, Default)]
pub struct ShadingPrograms {
    phong: PhongProgram,
    normal: NormalProgram,
}

impl ShadingPrograms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_mut(&mut self, mode: ShadingMode) -> &mut dyn ShadingProgram {
        match mode {
            ShadingMode::PhongLit => &mut self.phong,
            ShadingMode::NormalVisualization => &mut self.normal,
        }
    }

    pub fn all(&self) -> [&dyn ShadingProgram; 2] {
        [&self.phong, &self.normal]
    }
}

//! Model, view and projection matrices for one frame.
//!
//! The camera never moves. Orbiting, panning and zooming are all folded into
//! the model matrix:
//!
//! ```text
//! model = T(pan_x, 0, pan_z) * Rz(rotation_z) * Rx(rotation_x) * S(zoom, zoom * height, zoom)
//! ```
//!
//! so a vertex is scaled first, then rotated about X, then about Z, then
//! translated.

use cgmath::{perspective, Matrix4, Point3, Rad, Vector3};

use super::interaction::InteractionState;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Fixed camera and lens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewParams {
    pub eye: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for ViewParams {
    fn default() -> Self {
        Self {
            eye: Point3::new(0.0, 2.0, 4.0),
            target: Point3::new(0.0, 0.0, 0.0),
            up: Vector3::unit_y(),
            fovy: Rad(std::f32::consts::FRAC_PI_4),
            znear: 0.1,
            zfar: 20.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameMatrices {
    pub model: Matrix4<f32>,
    pub view: Matrix4<f32>,
    pub projection: Matrix4<f32>,
}

/// Builds the matrices for the current interaction state.
///
/// `height_exaggeration` scales only the Y axis; `aspect` is viewport width
/// over height.
pub fn compute_matrices(
    interaction: &InteractionState,
    height_exaggeration: f32,
    aspect: f32,
    view: &ViewParams,
) -> FrameMatrices {
    FrameMatrices {
        model: model_matrix(interaction, height_exaggeration),
        view: Matrix4::look_at_rh(view.eye, view.target, view.up),
        projection: OPENGL_TO_WGPU_MATRIX * perspective(view.fovy, aspect, view.znear, view.zfar),
    }
}

pub fn model_matrix(interaction: &InteractionState, height_exaggeration: f32) -> Matrix4<f32> {
    let zoom = interaction.zoom;
    Matrix4::from_translation(Vector3::new(interaction.pan_x, 0.0, interaction.pan_z))
        * Matrix4::from_angle_z(Rad(interaction.rotation_z))
        * Matrix4::from_angle_x(Rad(interaction.rotation_x))
        * Matrix4::from_nonuniform_scale(zoom, zoom * height_exaggeration, zoom)
}

/// Width over height, falling back to 1 for a collapsed viewport.
pub fn aspect_ratio(width: u32, height: u32) -> f32 {
    if width == 0 || height == 0 {
        1.0
    } else {
        width as f32 / height as f32
    }
}

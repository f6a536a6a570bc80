use crate::gfx::camera::{compute_matrices, ViewParams};
use crate::gfx::scene::RenderState;

use super::shading::{ShadingMode, ShadingProgram, ShadingPrograms, ShadingUniform};

/// What the engine needs to issue this frame's draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawRequest {
    pub mode: ShadingMode,
    pub uniform: ShadingUniform,
    pub wireframe: bool,
}

impl DrawRequest {
    /// Pipeline to bind. Falls back to the fill variant when the adapter
    /// cannot rasterize lines.
    pub fn pipeline_label(&self, line_mode_supported: bool) -> &'static str {
        self.mode.pipeline_label(self.wireframe && line_mode_supported)
    }
}

/// Selects the program for the current shading mode and fills its uniforms.
///
/// Returns `None` while there is nothing drawable, in which case the frame
/// is only cleared.
pub fn prepare_draw(
    state: &RenderState,
    programs: &mut ShadingPrograms,
    view: &ViewParams,
    aspect: f32,
) -> Option<DrawRequest> {
    if !state.mesh()?.is_drawable() {
        return None;
    }

    let matrices = compute_matrices(
        &state.interaction,
        state.controls.height_exaggeration(),
        aspect,
        view,
    );

    let program: &mut dyn ShadingProgram = programs.select_mut(state.shading_mode);
    program.set_matrices(&matrices);
    program.set_light_direction(state.controls.light_direction());

    Some(DrawRequest {
        mode: state.shading_mode,
        uniform: program.uniform(),
        wireframe: state.controls.wireframe,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewerConfig;
    use crate::gfx::geometry::{self, Mesh};
    use crate::ingest::HeightField;

    fn ready_state() -> RenderState {
        let mut state = RenderState::new(&ViewerConfig::default());
        let field = HeightField::new(vec![0.0, 1.0, 1.0, 0.0], 2, 2, Some([0.0, 1.0]));
        state.publish_mesh(geometry::build(&field));
        state
    }

    #[test]
    fn test_nothing_to_draw_before_first_load() {
        let state = RenderState::new(&ViewerConfig::default());
        let mut programs = ShadingPrograms::new();
        assert!(prepare_draw(&state, &mut programs, &ViewParams::default(), 1.0).is_none());
    }

    #[test]
    fn test_degenerate_mesh_is_skipped() {
        let mut state = RenderState::new(&ViewerConfig::default());
        state.publish_mesh(Mesh::default());
        let mut programs = ShadingPrograms::new();
        assert!(prepare_draw(&state, &mut programs, &ViewParams::default(), 1.0).is_none());
    }

    #[test]
    fn test_phong_receives_light_direction() {
        let mut state = ready_state();
        state.controls.light_x = 0.0;
        let mut programs = ShadingPrograms::new();

        let request = prepare_draw(&state, &mut programs, &ViewParams::default(), 1.5).unwrap();
        assert_eq!(request.pipeline_label(true), "Phong");
        assert!(!request.wireframe);
        assert_eq!(request.uniform.light_dir, [0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_mode_and_wireframe_select_pipeline() {
        let mut state = ready_state();
        state.shading_mode = ShadingMode::NormalVisualization;
        state.controls.wireframe = true;
        let mut programs = ShadingPrograms::new();

        let request = prepare_draw(&state, &mut programs, &ViewParams::default(), 1.0).unwrap();
        assert_eq!(request.pipeline_label(true), "Normal Wireframe");
        assert_eq!(request.pipeline_label(false), "Normal");
        assert!(request.wireframe);
    }

    #[test]
    fn test_height_percent_reaches_model_matrix() {
        let mut state = ready_state();
        state.controls.height_percent = 50.0;
        let mut programs = ShadingPrograms::new();

        let request = prepare_draw(&state, &mut programs, &ViewParams::default(), 1.0).unwrap();
        assert_eq!(request.uniform.model[1][1], 0.5);
        assert_eq!(request.uniform.model[0][0], 1.0);
    }
}

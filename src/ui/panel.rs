//! The viewer's control panel.

use crate::gfx::camera::interaction::DragMode;
use crate::gfx::rendering::ShadingMode;
use crate::gfx::scene::{LoadStatus, RenderState};

const HEIGHT_PERCENT_RANGE: (f32, f32) = (0.0, 200.0);
const LIGHT_RANGE: (f32, f32) = (-5.0, 5.0);
const ERROR_COLOR: [f32; 4] = [1.0, 0.45, 0.4, 1.0];

/// Requests the panel cannot satisfy on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelAction {
    #[default]
    None,
    /// Show the file picker
    OpenFile,
}

/// Draws the control panel and applies edits directly to `state`.
pub fn control_panel(ui: &imgui::Ui, state: &mut RenderState) -> PanelAction {
    let display_size = ui.io().display_size;
    if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
        return PanelAction::None;
    }

    let mut action = PanelAction::None;

    ui.window("Heightmap")
        .size([320.0, 420.0], imgui::Condition::FirstUseEver)
        .position([16.0, 16.0], imgui::Condition::FirstUseEver)
        .resizable(true)
        .collapsible(true)
        .build(|| {
            if ui.button("Open...") {
                action = PanelAction::OpenFile;
            }
            ui.same_line();
            if ui.button("Reset view") {
                state.interaction.reset();
            }
            render_status(ui, &state.status);

            ui.separator();
            ui.text("Shading");
            for mode in [ShadingMode::PhongLit, ShadingMode::NormalVisualization] {
                if mode != ShadingMode::PhongLit {
                    ui.same_line();
                }
                ui.radio_button(mode.display_name(), &mut state.shading_mode, mode);
            }
            ui.checkbox("Wireframe", &mut state.controls.wireframe);

            ui.separator();
            ui.slider_config("Height %", HEIGHT_PERCENT_RANGE.0, HEIGHT_PERCENT_RANGE.1)
                .display_format("%.0f")
                .build(&mut state.controls.height_percent);

            if state.shading_mode == ShadingMode::PhongLit {
                ui.slider("Light X", LIGHT_RANGE.0, LIGHT_RANGE.1, &mut state.controls.light_x);
                ui.slider("Light Z", LIGHT_RANGE.0, LIGHT_RANGE.1, &mut state.controls.light_z);
            }

            ui.separator();
            render_view_readout(ui, state);
        });

    action
}

fn render_status(ui: &imgui::Ui, status: &LoadStatus) {
    match status {
        LoadStatus::Failed(message) => ui.text_colored(ERROR_COLOR, message),
        other => ui.text_wrapped(status_line(other)),
    }
}

fn render_view_readout(ui: &imgui::Ui, state: &RenderState) {
    let view = &state.interaction;
    ui.text(format!("Zoom: {:.3}", view.zoom));
    ui.text(format!(
        "Rotation: z {:.2}  x {:.2}",
        view.rotation_z, view.rotation_x
    ));
    ui.text(format!("Pan: x {:.2}  z {:.2}", view.pan_x, view.pan_z));
    ui.text(drag_line(view.drag_mode()));
}

pub fn status_line(status: &LoadStatus) -> String {
    match status {
        LoadStatus::Idle => "Open a .bsq grid or an image, or drop one here".to_string(),
        LoadStatus::Loading(name) => format!("Loading {}...", name),
        LoadStatus::Loaded {
            name,
            vertices,
            triangles,
        } => format!("{}: {} vertices, {} triangles", name, vertices, triangles),
        LoadStatus::Failed(message) => message.clone(),
    }
}

fn drag_line(mode: Option<DragMode>) -> &'static str {
    match mode {
        Some(DragMode::Pan) => "Panning",
        Some(DragMode::Orbit) => "Orbiting",
        None => "Left drag: pan, right drag: orbit, wheel: zoom",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_lines() {
        assert_eq!(
            status_line(&LoadStatus::Loaded {
                name: "dem.bsq".into(),
                vertices: 16,
                triangles: 18,
            }),
            "dem.bsq: 16 vertices, 18 triangles"
        );
        assert_eq!(
            status_line(&LoadStatus::Loading("a.png".into())),
            "Loading a.png..."
        );
        assert!(status_line(&LoadStatus::Idle).contains(".bsq"));
    }

    #[test]
    fn test_drag_line() {
        assert_eq!(drag_line(Some(DragMode::Orbit)), "Orbiting");
        assert_eq!(drag_line(Some(DragMode::Pan)), "Panning");
    }
}

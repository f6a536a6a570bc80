use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
};

use super::interaction::{PointerButton, PointerEvent, ScrollDirection};

/// Translates winit window events into [`PointerEvent`]s.
///
/// winit reports button presses without a position, so the last cursor
/// position is remembered here.
#[derive(Debug, Default)]
pub struct PointerController {
    cursor: PhysicalPosition<f64>,
}

impl PointerController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn translate(&mut self, event: &WindowEvent) -> Option<PointerEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = *position;
                Some(PointerEvent::Move {
                    x: position.x as f32,
                    y: position.y as f32,
                })
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button,
                ..
            } => Some(PointerEvent::Down {
                button: pointer_button(*button),
                x: self.cursor.x as f32,
                y: self.cursor.y as f32,
            }),
            WindowEvent::MouseInput {
                state: ElementState::Released,
                ..
            } => Some(PointerEvent::Up),
            WindowEvent::CursorLeft { .. } => Some(PointerEvent::Leave),
            WindowEvent::MouseWheel { delta, .. } => {
                scroll_direction(delta).map(|direction| PointerEvent::Wheel { direction })
            }
            _ => None,
        }
    }
}

pub fn pointer_button(button: MouseButton) -> PointerButton {
    match button {
        MouseButton::Left => PointerButton::Primary,
        MouseButton::Right => PointerButton::Secondary,
        _ => PointerButton::Other,
    }
}

/// Positive wheel deltas scroll up (zoom in). A zero delta is ignored.
pub fn scroll_direction(delta: &MouseScrollDelta) -> Option<ScrollDirection> {
    let y = match delta {
        MouseScrollDelta::LineDelta(_, y) => *y as f64,
        MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => *y,
    };

    if y > 0.0 {
        Some(ScrollDirection::Up)
    } else if y < 0.0 {
        Some(ScrollDirection::Down)
    } else {
        None
    }
}

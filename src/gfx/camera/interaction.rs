//! Pointer-driven model manipulation.
//!
//! [`InteractionState`] folds discrete pointer and wheel events into the
//! rotation, pan and zoom accumulators read by the transform pipeline each
//! frame. Nothing is clamped: rotation and pan grow without bound and zoom is
//! purely multiplicative.

/// Tuning for the event reducer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionSettings {
    /// Radians (orbit) or world units (pan) per pixel of pointer motion
    pub drag_sensitivity: f32,
    /// Zoom factor applied per wheel notch
    pub zoom_ratio: f32,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            drag_sensitivity: 0.01,
            zoom_ratio: 1.05,
        }
    }
}

/// Which pointer button went down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

/// Input events in arrival order, positions in window pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { button: PointerButton, x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Up,
    Leave,
    Wheel { direction: ScrollDirection },
}

/// What a drag gesture manipulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    /// Primary button: translate the model in the ground plane
    Pan,
    /// Secondary button: rotate the model about its Z and X axes
    Orbit,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragGesture {
    mode: DragMode,
    last_x: f32,
    last_y: f32,
}

/// Accumulated model transform plus the drag in progress, if any.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionState {
    pub rotation_z: f32,
    pub rotation_x: f32,
    pub pan_x: f32,
    pub pan_z: f32,
    pub zoom: f32,
    drag: Option<DragGesture>,
    settings: InteractionSettings,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self::new(InteractionSettings::default())
    }
}

impl InteractionState {
    pub fn new(settings: InteractionSettings) -> Self {
        Self {
            rotation_z: 0.0,
            rotation_x: 0.0,
            pan_x: 0.0,
            pan_z: 0.0,
            zoom: 1.0,
            drag: None,
            settings,
        }
    }

    pub fn settings(&self) -> InteractionSettings {
        self.settings
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn drag_mode(&self) -> Option<DragMode> {
        self.drag.map(|drag| drag.mode)
    }

    /// Applies one event.
    pub fn apply(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { button, x, y } => self.begin_drag(button, x, y),
            PointerEvent::Move { x, y } => self.drag_to(x, y),
            PointerEvent::Up | PointerEvent::Leave => self.drag = None,
            PointerEvent::Wheel { direction } => match direction {
                ScrollDirection::Up => self.zoom *= self.settings.zoom_ratio,
                ScrollDirection::Down => self.zoom /= self.settings.zoom_ratio,
            },
        }
    }

    /// Restores the initial transform. Only invoked by an explicit user command.
    pub fn reset(&mut self) {
        *self = Self::new(self.settings);
    }

    fn begin_drag(&mut self, button: PointerButton, x: f32, y: f32) {
        let mode = match button {
            PointerButton::Primary => DragMode::Pan,
            PointerButton::Secondary => DragMode::Orbit,
            PointerButton::Other => return,
        };
        self.drag = Some(DragGesture {
            mode,
            last_x: x,
            last_y: y,
        });
    }

    fn drag_to(&mut self, x: f32, y: f32) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };

        let k = self.settings.drag_sensitivity;
        let dx = (x - drag.last_x) * k;
        let dy = (y - drag.last_y) * k;

        match drag.mode {
            DragMode::Pan => {
                self.pan_x += dx;
                self.pan_z += dy;
            }
            DragMode::Orbit => {
                self.rotation_z += dx;
                self.rotation_x += dy;
            }
        }

        drag.last_x = x;
        drag.last_y = y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn down(button: PointerButton, x: f32, y: f32) -> PointerEvent {
        PointerEvent::Down { button, x, y }
    }

    #[test]
    fn test_zoom_up_then_down_is_identity() {
        let mut state = InteractionState::default();
        state.apply(PointerEvent::Wheel {
            direction: ScrollDirection::Up,
        });
        assert_relative_eq!(state.zoom, 1.05, epsilon = 1e-6);
        state.apply(PointerEvent::Wheel {
            direction: ScrollDirection::Down,
        });
        assert_relative_eq!(state.zoom, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_zoom_is_exponential() {
        let mut state = InteractionState::default();
        for _ in 0..3 {
            state.apply(PointerEvent::Wheel {
                direction: ScrollDirection::Down,
            });
        }
        assert_relative_eq!(state.zoom, 1.0 / 1.05f32.powi(3), epsilon = 1e-6);
        assert!(state.zoom > 0.0);
    }

    #[test]
    fn test_primary_drag_pans() {
        let mut state = InteractionState::default();
        state.apply(down(PointerButton::Primary, 0.0, 0.0));
        state.apply(PointerEvent::Move { x: 10.0, y: 0.0 });

        assert_eq!(state.drag_mode(), Some(DragMode::Pan));
        assert_relative_eq!(state.pan_x, 0.1, epsilon = 1e-6);
        assert_eq!(state.pan_z, 0.0);
        assert_eq!(state.rotation_z, 0.0);
    }

    #[test]
    fn test_secondary_drag_orbits_incrementally() {
        let mut state = InteractionState::default();
        state.apply(down(PointerButton::Secondary, 100.0, 100.0));
        state.apply(PointerEvent::Move { x: 110.0, y: 95.0 });
        state.apply(PointerEvent::Move { x: 130.0, y: 95.0 });

        assert_relative_eq!(state.rotation_z, 0.3, epsilon = 1e-6);
        assert_relative_eq!(state.rotation_x, -0.05, epsilon = 1e-6);
        assert_eq!(state.pan_x, 0.0);
    }

    #[test]
    fn test_move_without_drag_is_noop() {
        let mut state = InteractionState::default();
        state.apply(PointerEvent::Move { x: 50.0, y: 50.0 });
        assert_eq!(state, InteractionState::default());
    }

    #[test]
    fn test_up_and_leave_end_drag() {
        let mut state = InteractionState::default();
        state.apply(down(PointerButton::Primary, 0.0, 0.0));
        state.apply(PointerEvent::Up);
        state.apply(PointerEvent::Move { x: 40.0, y: 40.0 });
        assert!(!state.is_dragging());
        assert_eq!(state.pan_x, 0.0);

        state.apply(down(PointerButton::Secondary, 0.0, 0.0));
        state.apply(PointerEvent::Leave);
        assert!(!state.is_dragging());
    }

    #[test]
    fn test_other_button_does_not_drag() {
        let mut state = InteractionState::default();
        state.apply(down(PointerButton::Other, 0.0, 0.0));
        assert!(!state.is_dragging());
    }

    #[test]
    fn test_rotation_is_unbounded() {
        let mut state = InteractionState::default();
        state.apply(down(PointerButton::Secondary, 0.0, 0.0));
        state.apply(PointerEvent::Move { x: 1000.0, y: 0.0 });
        assert_relative_eq!(state.rotation_z, 10.0, epsilon = 1e-4);
    }

    #[test]
    fn test_reset_keeps_settings() {
        let settings = InteractionSettings {
            drag_sensitivity: 0.5,
            zoom_ratio: 2.0,
        };
        let mut state = InteractionState::new(settings);
        state.apply(PointerEvent::Wheel {
            direction: ScrollDirection::Up,
        });
        assert_eq!(state.zoom, 2.0);
        state.reset();
        assert_eq!(state.zoom, 1.0);
        assert_eq!(state.settings(), settings);
    }
}

//! Everything the render loop reads each frame.
//!
//! [`RenderState`] is owned by the application and passed by reference to
//! the UI and the renderer. The mesh is only ever swapped wholesale through
//! [`RenderState::publish_mesh`], which bumps a generation counter the GPU
//! side uses to decide when to re-upload.

use std::sync::Arc;

use cgmath::{InnerSpace, Vector3};

use crate::config::ViewerConfig;
use crate::gfx::camera::InteractionState;
use crate::gfx::geometry::Mesh;
use crate::gfx::rendering::ShadingMode;
use crate::ingest::{LoadOutcome, SourceKind};

/// User-adjustable rendering controls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Controls {
    /// Vertical exaggeration in percent
    pub height_percent: f32,
    pub light_x: f32,
    pub light_z: f32,
    pub wireframe: bool,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            height_percent: 100.0,
            light_x: 1.0,
            light_z: 0.0,
            wireframe: false,
        }
    }
}

impl Controls {
    pub fn height_exaggeration(&self) -> f32 {
        self.height_percent / 100.0
    }

    /// `normalize(light_x, 1, light_z)`. The fixed Y component keeps this
    /// non-zero.
    pub fn light_direction(&self) -> Vector3<f32> {
        Vector3::new(self.light_x, 1.0, self.light_z).normalize()
    }
}

/// Progress of the most recent load, shown in the control panel.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading(String),
    Loaded {
        name: String,
        vertices: usize,
        triangles: usize,
    },
    Failed(String),
}

pub struct RenderState {
    mesh: Option<Arc<Mesh>>,
    generation: u64,
    pub interaction: InteractionState,
    pub shading_mode: ShadingMode,
    pub controls: Controls,
    pub status: LoadStatus,
}

impl RenderState {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            mesh: None,
            generation: 0,
            interaction: InteractionState::new(config.interaction),
            shading_mode: config.shading_mode,
            controls: config.controls,
            status: LoadStatus::Idle,
        }
    }

    pub fn mesh(&self) -> Option<&Arc<Mesh>> {
        self.mesh.as_ref()
    }

    /// Incremented on every publish, starting from 0 for "no mesh yet".
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True once any mesh has been published.
    pub fn is_ready(&self) -> bool {
        self.mesh.is_some()
    }

    pub fn publish_mesh(&mut self, mesh: Mesh) {
        self.mesh = Some(Arc::new(mesh));
        self.generation += 1;
    }

    pub fn begin_loading(&mut self, name: &str) {
        self.status = LoadStatus::Loading(name.to_owned());
    }

    /// Applies a finished load. Failures leave the mesh and interaction
    /// state as they were.
    pub fn apply_outcome(&mut self, outcome: LoadOutcome) {
        match outcome.result {
            Ok(loaded) => {
                if loaded.kind == SourceKind::Image {
                    self.controls.wireframe = false;
                }
                self.status = LoadStatus::Loaded {
                    name: outcome.name,
                    vertices: loaded.mesh.vertex_count(),
                    triangles: loaded.mesh.triangle_count(),
                };
                self.publish_mesh(loaded.mesh);
            }
            Err(e) => {
                log::error!("Failed to load '{}': {}", outcome.name, e);
                self.status = LoadStatus::Failed(format!("{}: {}", outcome.name, e));
            }
        }
    }
}

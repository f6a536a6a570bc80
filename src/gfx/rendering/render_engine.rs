//! wgpu rendering engine.
//!
//! Owns the surface, device and queue, one uniform buffer shared by both
//! shading pipelines, the depth buffer and the GPU copy of the current mesh.
//! Each frame is a single pass: clear, at most one indexed draw, then the UI
//! overlay.

use std::sync::Arc;
use wgpu::TextureFormat;

use crate::error::{HeightviewError, Result};
use crate::gfx::resources::DepthTexture;
use crate::gfx::scene::RenderState;
use crate::wgpu_utils::UniformBuffer;

use super::frame::DrawRequest;
use super::gpu_mesh::{DrawMesh, GpuMesh};
use super::pipeline_manager::{PipelineConfig, PipelineManager};
use super::shading::{ShadingPrograms, ShadingUniform};

pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    format: TextureFormat,
    depth_texture: DepthTexture,
    pipeline_manager: PipelineManager,
    frame_uniform: UniformBuffer<ShadingUniform>,
    frame_bind_group: wgpu::BindGroup,
    mesh: Option<GpuMesh>,
    clear_color: wgpu::Color,
    line_mode_supported: bool,
    warned_no_line_mode: bool,
}

impl RenderEngine {
    /// Acquires an adapter and device for `window` and builds every shading
    /// pipeline up front.
    ///
    /// Fails with [`HeightviewError::Graphics`] when no usable adapter or
    /// device is available.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        vsync: bool,
        clear_color: wgpu::Color,
    ) -> Result<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .map_err(|e| HeightviewError::Graphics(format!("Failed to create surface: {e}")))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| HeightviewError::Graphics(format!("Failed to request adapter: {e}")))?;

        let info = adapter.get_info();
        log::info!("Using adapter '{}' ({:?})", info.name, info.backend);

        let line_mode_supported = adapter
            .features()
            .contains(wgpu::Features::POLYGON_MODE_LINE);
        let required_features = if line_mode_supported {
            wgpu::Features::POLYGON_MODE_LINE
        } else {
            wgpu::Features::empty()
        };

        // Heightmap meshes can exceed the 256 MiB downlevel buffer cap.
        let required_limits = wgpu::Limits {
            max_buffer_size: adapter.limits().max_buffer_size,
            ..wgpu::Limits::downlevel_defaults().using_resolution(adapter.limits())
        };

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Heightview Device"),
                required_features,
                required_limits,
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|e| HeightviewError::Graphics(format!("Failed to request device: {e}")))?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or_else(|| HeightviewError::Graphics("Surface reports no formats".into()))?;
        let alpha_mode = surface_capabilities
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: present_mode(vsync),
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = DepthTexture::new(&device, &config, "Depth Texture");

        let frame_uniform = UniformBuffer::<ShadingUniform>::new(&device);
        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Frame Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_uniform.binding_resource(),
            }],
        });

        let device: Arc<wgpu::Device> = device.into();
        let queue: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device.clone());

        for program in ShadingPrograms::new().all() {
            let mode = program.mode();
            let shader = mode.pipeline_label(false);
            pipeline_manager.load_shader(shader, program.shader_source());

            let fill = PipelineConfig::default_with_shader(shader)
                .with_label(shader)
                .with_bind_group_layouts(vec![frame_layout.clone()])
                .with_depth_format(DepthTexture::FORMAT)
                .with_color_format(format);

            if line_mode_supported {
                let line = mode.pipeline_label(true);
                pipeline_manager.register_pipeline(
                    line,
                    fill.clone()
                        .with_label(line)
                        .with_polygon_mode(wgpu::PolygonMode::Line),
                );
            }
            pipeline_manager.register_pipeline(shader, fill);
        }

        if let Err(errors) = pipeline_manager.create_all_pipelines() {
            for error in &errors {
                log::error!("{}", error);
            }
            return Err(HeightviewError::Graphics(errors.join("; ")));
        }
        log::debug!("Created {} pipelines", pipeline_manager.pipeline_count());

        Ok(RenderEngine {
            surface,
            device,
            queue,
            config,
            format,
            depth_texture,
            pipeline_manager,
            frame_uniform,
            frame_bind_group,
            mesh: None,
            clear_color,
            line_mode_supported,
            warned_no_line_mode: false,
        })
    }

    /// Re-uploads the mesh when `state` has published a new one.
    pub fn sync_mesh(&mut self, state: &RenderState) {
        let uploaded = self.mesh.as_ref().map(GpuMesh::generation);
        if uploaded == Some(state.generation()) {
            return;
        }

        match state.mesh() {
            Some(mesh) => {
                self.mesh = GpuMesh::upload(&self.device, mesh, state.generation());
            }
            None => self.mesh = None,
        }
    }

    /// Draws one frame.
    ///
    /// The surface is always cleared. `draw` is skipped when no mesh has been
    /// uploaded. `ui_callback` runs after the scene pass against the same
    /// encoder and target view.
    pub fn render_frame<F>(&mut self, draw: Option<&DrawRequest>, ui_callback: Option<F>)
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(e) => {
                log::error!("Failed to acquire surface texture: {}", e);
                return;
            }
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        if let Some(request) = draw {
            self.frame_uniform.update_content(&self.queue, request.uniform);
            if request.wireframe && !self.line_mode_supported && !self.warned_no_line_mode {
                log::warn!("Adapter does not support line polygon mode; drawing filled");
                self.warned_no_line_mode = true;
            }
        }

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Heightmap Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if let (Some(request), Some(mesh)) = (draw, self.mesh.as_ref()) {
                let label = request.pipeline_label(self.line_mode_supported);
                if let Some(pipeline) = self.pipeline_manager.get_pipeline(label) {
                    render_pass.set_pipeline(pipeline);
                    render_pass.set_bind_group(0, &self.frame_bind_group, &[]);
                    render_pass.draw_mesh(mesh);
                }
            }
        }

        if let Some(ui_callback) = ui_callback {
            ui_callback(&self.device, &self.queue, &mut encoder, &surface_texture_view);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture = DepthTexture::new(&self.device, &self.config, "Depth Texture");
    }

    pub fn surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> TextureFormat {
        self.format
    }

    /// Largest single buffer the device accepts.
    pub fn max_buffer_size(&self) -> u64 {
        self.device.limits().max_buffer_size
    }
}

fn present_mode(vsync: bool) -> wgpu::PresentMode {
    if vsync {
        wgpu::PresentMode::AutoVsync
    } else {
        wgpu::PresentMode::AutoNoVsync
    }
}

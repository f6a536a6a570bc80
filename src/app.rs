use std::path::PathBuf;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes},
};

use crate::config::ViewerConfig;
use crate::error::{HeightviewError, Result};
use crate::gfx::camera::interaction::PointerEvent;
use crate::gfx::camera::transform::aspect_ratio;
use crate::gfx::camera::PointerController;
use crate::gfx::rendering::{prepare_draw, RenderEngine, ShadingPrograms};
use crate::gfx::scene::RenderState;
use crate::ingest::{LoadRequest, Loader, RAW_FLOAT_SUFFIX};
use crate::ui::{control_panel, PanelAction, UiManager};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "tga", "tif", "tiff", "webp"];

/// The heightmap viewer: one window, one mesh, one control panel.
pub struct HeightviewApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    config: ViewerConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    state: RenderState,
    programs: ShadingPrograms,
    pointer: PointerController,
    loader: Loader,
    fatal: Option<HeightviewError>,
}

impl HeightviewApp {
    /// Creates the event loop and starts the loader. The window and GPU are
    /// brought up once the platform reports the app as resumed, and the
    /// initial file is loaded after that.
    pub fn new(config: ViewerConfig) -> Result<Self> {
        let event_loop = EventLoop::new()?;

        let app_state = AppState {
            state: RenderState::new(&config),
            window: None,
            render_engine: None,
            ui_manager: None,
            programs: ShadingPrograms::new(),
            pointer: PointerController::new(),
            loader: Loader::spawn(wgpu::Limits::downlevel_defaults().max_buffer_size),
            fatal: None,
            config,
        };

        Ok(Self {
            event_loop: Some(event_loop),
            app_state,
        })
    }

    /// Runs until the window closes. Returns the startup error if the window
    /// or GPU could not be created.
    pub fn run(mut self) -> Result<()> {
        let Some(event_loop) = self.event_loop.take() else {
            return Ok(());
        };
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self.app_state)?;

        match self.app_state.fatal.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

fn submit(loader: &Loader, state: &mut RenderState, request: LoadRequest) {
    state.begin_loading(&request.name());
    loader.request(request);
}

/// Blocking native file picker.
fn pick_heightmap() -> Option<PathBuf> {
    let raw_extension = RAW_FLOAT_SUFFIX.trim_start_matches('.');
    let mut all = vec![raw_extension];
    all.extend_from_slice(IMAGE_EXTENSIONS);

    rfd::FileDialog::new()
        .set_title("Open heightmap")
        .add_filter("Heightmaps", all.as_slice())
        .add_filter("Raw Float32 grid", &[raw_extension])
        .add_filter("Images", IMAGE_EXTENSIONS)
        .pick_file()
}

impl AppState {
    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attributes = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(
                self.config.window_width,
                self.config.window_height,
            ));
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .map_err(|e| HeightviewError::Graphics(format!("Failed to create window: {e}")))?,
        );

        let (width, height) = window.inner_size().into();
        let renderer = pollster::block_on(RenderEngine::new(
            window.clone(),
            width,
            height,
            self.config.vsync,
            self.config.clear_color(),
        ))?;

        let mut ui_manager = UiManager::new(
            renderer.device(),
            renderer.queue(),
            renderer.surface_format(),
            &window,
        );
        ui_manager.update_display_size(width, height);

        log::info!("Window ready at {}x{}", width, height);
        self.loader.set_max_buffer_size(renderer.max_buffer_size());
        if let Some(path) = self.config.initial_file.clone() {
            submit(&self.loader, &mut self.state, LoadRequest::Path(path));
        }

        self.window = Some(window);
        self.render_engine = Some(renderer);
        self.ui_manager = Some(ui_manager);
        Ok(())
    }

    fn redraw(&mut self) {
        let AppState {
            config,
            window,
            render_engine,
            ui_manager,
            state,
            programs,
            loader,
            ..
        } = self;
        let (Some(window), Some(render_engine)) = (window.as_ref(), render_engine.as_mut()) else {
            return;
        };

        while let Some(outcome) = loader.try_recv() {
            state.apply_outcome(outcome);
        }
        render_engine.sync_mesh(state);

        let (width, height) = render_engine.surface_size();
        let draw = prepare_draw(state, programs, &config.view, aspect_ratio(width, height));

        let mut action = PanelAction::None;
        match ui_manager.as_mut() {
            Some(ui_manager) => render_engine.render_frame(
                draw.as_ref(),
                Some(|device: &wgpu::Device,
                      queue: &wgpu::Queue,
                      encoder: &mut wgpu::CommandEncoder,
                      view: &wgpu::TextureView| {
                    ui_manager.draw(device, queue, encoder, window, view, |ui| {
                        action = control_panel(ui, state);
                    });
                }),
            ),
            None => render_engine.render_frame(
                draw.as_ref(),
                None::<fn(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView)>,
            ),
        }

        if action == PanelAction::OpenFile {
            if let Some(path) = pick_heightmap() {
                submit(loader, state, LoadRequest::Path(path));
            }
        }
    }

    fn forward_pointer(&mut self, event: &WindowEvent, ui_wants_pointer: bool) {
        let Some(pointer_event) = self.pointer.translate(event) else {
            return;
        };
        // A drag must always be able to end, even over the panel.
        let ends_drag = matches!(pointer_event, PointerEvent::Up | PointerEvent::Leave);
        if ends_drag || !ui_wants_pointer {
            self.state.interaction.apply(pointer_event);
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.start(event_loop) {
            log::error!("{}", e);
            self.fatal = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };

        let mut ui_wants_pointer = false;
        if let Some(ui_manager) = self.ui_manager.as_mut() {
            let ui_event: winit::event::Event<()> = winit::event::Event::WindowEvent {
                window_id,
                event: event.clone(),
            };
            if ui_manager.handle_input(&window, &ui_event) {
                ui_wants_pointer = ui_manager.wants_pointer();
            }
        }

        self.forward_pointer(&event, ui_wants_pointer);

        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                event_loop.exit();
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
                if let Some(ui_manager) = self.ui_manager.as_mut() {
                    ui_manager.update_display_size(width, height);
                }
            }
            WindowEvent::DroppedFile(path) => {
                submit(&self.loader, &mut self.state, LoadRequest::Path(path));
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}

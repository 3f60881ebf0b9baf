use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec3;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::WindowId,
};

use orbit_viewer::cli::Cli;
use orbit_viewer::config::ViewerConfig;
use orbit_viewer::core::{
    EventDispatcher, FpsCounter, InputEvent, Key, KeyEvent, OrbitInput, SurfaceRenderer, WinitController,
};
use orbit_viewer::frame::FrameClock;
use orbit_viewer::hud::{Hud, HudStats};
use orbit_viewer::scene::{GeometryLibrary, MaterialLibrary, Scene};
use orbit_viewer::scenes::create_scenes;
use orbit_viewer::window::Window;
use orbit_viewer::{Camera, GraphicsError, RenderError, Renderer, StartupError, ToggleState, ViewerState};

// === Viewer ===

/// Everything that exists once the window is open
struct Viewer {
    window: Window,
    renderer: Renderer<SurfaceRenderer>,
    hud: Option<Hud>,
    scenes: Vec<Scene>,
    state: ViewerState,
}

impl Viewer {
    fn start(event_loop: &ActiveEventLoop, config: &ViewerConfig) -> Result<Self> {
        let window = Window::create(event_loop, &config.window).context("Failed to create window")?;

        let mut materials = MaterialLibrary::with_builtins();
        if let Some(dir) = &config.render.shader_dir {
            materials.load_dir(dir)?;
        }
        let mut geometry = GeometryLibrary::new();
        let scenes = create_scenes(&materials, &mut geometry, config.render.mesh.as_deref())?;

        let mut backend = SurfaceRenderer::new(window.inner().clone())?;
        backend.upload_geometry(&geometry);
        backend.build_pipelines(&materials)?;

        let hud = config
            .render
            .show_hud
            .then(|| Hud::new(window.inner(), backend.gpu().device(), backend.format()));

        let fallback_aspect = config.window.width as f32 / config.window.height as f32;
        let camera = Camera::with_projection(
            window.aspect_ratio().unwrap_or(fallback_aspect),
            config.camera.field_of_view,
            config.camera.near,
            config.camera.far,
        )?;
        let mut toggles = ToggleState::new(scenes.len())?;
        toggles.select_scene(config.render.scene)?;
        toggles.show_solid = config.render.show_solid;
        toggles.show_wireframe = config.render.show_wireframe;
        let orbit = OrbitInput::new(config.camera.sensitivity, Vec3::ZERO);
        let state = ViewerState::new(camera, toggles, orbit, config.camera.home_pose())?;

        let renderer = Renderer::new(backend).with_clear_color(config.render.clear_color);
        log::info!("Viewer ready: {} scenes", scenes.len());

        Ok(Self {
            window,
            renderer,
            hud,
            scenes,
            state,
        })
    }
}

// === Application ===

struct App {
    config: ViewerConfig,
    dispatcher: EventDispatcher,
    controller: WinitController,
    pending: Vec<InputEvent>,
    clock: FrameClock,
    fps: FpsCounter,
    viewer: Option<Viewer>,
    error: Option<anyhow::Error>,
}

impl App {
    fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            dispatcher: EventDispatcher::with_default_bindings(),
            controller: WinitController::new(),
            pending: Vec::new(),
            clock: FrameClock::new(),
            fps: FpsCounter::default(),
            viewer: None,
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{:#}", err);
        self.error = Some(err);
        event_loop.exit();
    }

    /// Folds this frame's input into the state, then draws and presents
    fn redraw(&mut self) -> Result<()> {
        let Some(viewer) = self.viewer.as_mut() else {
            return Ok(());
        };

        let frame = self.clock.tick();
        if let Some(fps) = self.fps.tick(frame.delta) {
            log::info!("FPS: {:.1}", fps);
        }

        if let Some(sample) = self.controller.pointer_sample() {
            self.pending.push(sample);
        }
        let events = std::mem::take(&mut self.pending);
        viewer.state = self.dispatcher.advance(viewer.state, &events)?;

        // Minimized: nothing to draw into
        if viewer.window.aspect_ratio().is_none() {
            return Ok(());
        }

        let active = viewer.state.toggles.active_scene();
        let scene = viewer
            .scenes
            .get(active)
            .with_context(|| format!("No scene in slot {}", active + 1))?;

        viewer.renderer.set_current_time(frame.time);
        let passes = viewer
            .renderer
            .render_frame(scene, &viewer.state.camera, &viewer.state.toggles)?;

        if let Some(hud) = viewer.hud.as_mut() {
            let stats = HudStats {
                fps: self.fps.fps(),
                scene_name: scene.name.clone(),
                toggles: viewer.state.toggles,
                passes,
            };
            let window = viewer.window.inner();
            viewer
                .renderer
                .backend_mut()
                .draw_overlay(|target| hud.draw(window, target, &stats))?;
        }

        viewer.renderer.present()?;
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.viewer.is_some() {
            return;
        }
        match Viewer::start(event_loop, &self.config) {
            Ok(viewer) => self.viewer = Some(viewer),
            Err(err) => self.fail(event_loop, err.context("Failed to start viewer")),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(viewer) = self.viewer.as_mut() else {
            return;
        };

        match &event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
                return;
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = self.redraw() {
                    self.fail(event_loop, err);
                }
                return;
            }
            WindowEvent::Resized(size) => {
                viewer.renderer.backend_mut().resize(size.width, size.height);
            }
            _ => {}
        }

        // Let egui handle the event first
        if let Some(hud) = viewer.hud.as_mut() {
            if hud.on_window_event(viewer.window.inner(), &event) && !matches!(event, WindowEvent::Resized(_)) {
                return;
            }
        }

        match self.controller.process_event(&event) {
            Some(InputEvent::Key(KeyEvent {
                key: Key::Escape,
                pressed: true,
            })) => event_loop.exit(),
            Some(input) => self.pending.push(input),
            None => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(viewer) = &self.viewer {
            viewer.window.request_redraw();
        }
    }
}

/// Process exit code: 3 for shader errors, 2 for graphics errors, 1 otherwise
fn exit_code(err: &anyhow::Error) -> u8 {
    for cause in err.chain() {
        if let Some(startup) = cause.downcast_ref::<StartupError>() {
            return match startup {
                StartupError::ShaderCompilation { .. } => 3,
                StartupError::Graphics(_) => 2,
                _ => 1,
            };
        }
        if cause.is::<GraphicsError>() || cause.is::<RenderError>() {
            return 2;
        }
    }
    1
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve().context("Invalid configuration")?;

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config);

    log::info!("Orbit Viewer - Controls: drag LMB to orbit, 1/2/3 scenes, W wireframe, S solid, Enter reset, Escape quit");
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(exit_code(&err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbit_viewer::config::ConfigError;
    use orbit_viewer::CameraError;

    #[test]
    fn test_shader_failure_exits_with_3() {
        let err = anyhow::Error::new(StartupError::ShaderCompilation {
            material: "noise".to_string(),
            message: "unknown identifier".to_string(),
        })
        .context("Failed to start viewer");
        assert_eq!(exit_code(&err), 3);
    }

    #[test]
    fn test_graphics_failures_exit_with_2() {
        let missing = anyhow::Error::new(GraphicsError::MissingFeature("POLYGON_MODE_LINE"));
        assert_eq!(exit_code(&missing), 2);

        let pass = anyhow::Error::new(RenderError::Pass {
            pass: "wireframe",
            source: GraphicsError::Validation("bad pipeline".to_string()),
        });
        assert_eq!(exit_code(&pass), 2);

        let startup = anyhow::Error::new(StartupError::Graphics(GraphicsError::NoFrame))
            .context("Failed to start viewer");
        assert_eq!(exit_code(&startup), 2);
    }

    #[test]
    fn test_other_failures_exit_with_1() {
        let camera = anyhow::Error::new(CameraError::InvalidAspectRatio(0.0));
        assert_eq!(exit_code(&camera), 1);

        let config = anyhow::Error::new(ConfigError::Invalid("scene must be between 1 and 3".to_string()))
            .context("Invalid configuration");
        assert_eq!(exit_code(&config), 1);

        let startup = anyhow::Error::new(StartupError::Camera(CameraError::InvalidFieldOfView(0.0)));
        assert_eq!(exit_code(&startup), 1);
    }
}

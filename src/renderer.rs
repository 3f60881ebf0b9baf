use crate::camera::Camera;
use crate::core::backend::{DrawCommand, PassBackend};
use crate::core::pass::PassKind;
use crate::error::RenderError;
use crate::scene::Scene;
use crate::state::ToggleState;
use crate::types::DrawUniform;

pub const DEFAULT_CLEAR_COLOR: [f32; 4] = [0.02, 0.02, 0.05, 1.0];

/// Per-frame pass orchestration on top of a [`PassBackend`]
pub struct Renderer<B> {
    backend: B,
    clear_color: [f32; 4],
    current_time: f32,
    frame_cleared: bool,
}

impl<B: PassBackend> Renderer<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            clear_color: DEFAULT_CLEAR_COLOR,
            current_time: 0.0,
            frame_cleared: false,
        }
    }

    pub fn with_clear_color(mut self, color: [f32; 4]) -> Self {
        self.clear_color = color;
        self
    }

    pub fn clear_color(&self) -> [f32; 4] {
        self.clear_color
    }

    /// Starts a frame: clears color and depth
    pub fn clear(&mut self) -> Result<(), RenderError> {
        self.backend
            .clear(self.clear_color)
            .map_err(RenderError::Clear)?;
        self.frame_cleared = true;
        Ok(())
    }

    /// Elapsed seconds fed to the shaders. Values behind the last accepted one are ignored.
    pub fn set_current_time(&mut self, time: f32) {
        if !time.is_finite() || time < self.current_time {
            log::debug!("Ignoring time {} (current {})", time, self.current_time);
            return;
        }
        self.current_time = time;
    }

    pub fn current_time(&self) -> f32 {
        self.current_time
    }

    /// Draws every object of `scene` in one pass with that pass's raster state
    pub fn render_scene(&mut self, scene: &Scene, camera: &Camera, pass: PassKind) -> Result<(), RenderError> {
        if !self.frame_cleared {
            return Err(RenderError::FrameNotCleared { pass: pass.name() });
        }

        let view = camera.view_matrix();
        let projection = camera.projection_matrix();
        let time = self.current_time;
        let wrap = |source| RenderError::Pass {
            pass: pass.name(),
            source,
        };

        self.backend
            .begin_pass(pass, &pass.raster_state())
            .map_err(wrap)?;
        for object in &scene.objects {
            let command = DrawCommand {
                geometry: object.geometry,
                material: object.material,
                uniform: DrawUniform::new(
                    view,
                    projection,
                    object.transform,
                    object.color,
                    time,
                    pass.shader_tag(),
                ),
            };
            self.backend.draw(&command).map_err(wrap)?;
        }
        self.backend.end_pass().map_err(wrap)
    }

    /// Clears, then runs the passes enabled in `toggles`. Returns the passes that ran.
    pub fn render_frame(
        &mut self,
        scene: &Scene,
        camera: &Camera,
        toggles: &ToggleState,
    ) -> Result<Vec<PassKind>, RenderError> {
        self.clear()?;
        let mut rendered = Vec::with_capacity(PassKind::ALL.len());
        for pass in toggles.passes() {
            self.render_scene(scene, camera, pass)?;
            rendered.push(pass);
        }
        Ok(rendered)
    }

    /// Hands the frame to the backend; the next pass needs a new `clear`
    pub fn present(&mut self) -> Result<(), RenderError> {
        self.frame_cleared = false;
        self.backend.present().map_err(RenderError::Present)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

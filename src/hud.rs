use winit::event::WindowEvent;
use winit::window::Window;

use crate::core::pass::PassKind;
use crate::core::surface_renderer::OverlayTarget;
use crate::state::ToggleState;

/// Values shown by the overlay each frame
#[derive(Debug, Clone, PartialEq)]
pub struct HudStats {
    pub fps: f32,
    pub scene_name: String,
    pub toggles: ToggleState,
    pub passes: Vec<PassKind>,
}

const KEY_HELP: [(&str, &str); 6] = [
    ("1 2 3", "select scene"),
    ("W", "toggle wireframe"),
    ("S", "toggle solid"),
    ("Enter", "reset camera"),
    ("LMB drag", "orbit"),
    ("Esc", "quit"),
];

/// egui overlay with FPS, active scene, pass toggles and key help
pub struct Hud {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

impl Hud {
    pub fn new(window: &Window, device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let ctx = egui::Context::default();
        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let renderer = egui_wgpu::Renderer::new(device, format, egui_wgpu::RendererOptions::default());
        Self { ctx, state, renderer }
    }

    /// Returns true when egui consumed the event
    pub fn on_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.state.on_window_event(window, event).consumed
    }

    pub fn draw(&mut self, window: &Window, target: OverlayTarget<'_>, stats: &HudStats) {
        let raw_input = self.state.take_egui_input(window);
        let full_output = self.ctx.run(raw_input, |ctx| Self::layout(ctx, stats));

        self.state
            .handle_platform_output(window, full_output.platform_output);

        let tris = self
            .ctx
            .tessellate(full_output.shapes, self.ctx.pixels_per_point());
        for (id, image_delta) in &full_output.textures_delta.set {
            self.renderer
                .update_texture(target.device, target.queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: target.size,
            pixels_per_point: window.scale_factor() as f32,
        };
        self.renderer.update_buffers(
            target.device,
            target.queue,
            target.encoder,
            &tris,
            &screen_descriptor,
        );

        {
            let render_pass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            self.renderer
                .render(&mut render_pass.forget_lifetime(), &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }

    fn layout(ctx: &egui::Context, stats: &HudStats) {
        egui::Window::new("Viewer")
            .title_bar(false)
            .resizable(false)
            .fixed_pos(egui::pos2(10.0, 10.0))
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                ui.label(
                    egui::RichText::new(format!("{:.0}", stats.fps))
                        .size(48.0)
                        .color(egui::Color32::from_rgb(74, 158, 255)),
                );
                ui.label(egui::RichText::new("FPS").size(12.0).color(egui::Color32::GRAY));
                ui.separator();
                ui.label(scene_line(stats));
                ui.label(pass_line(&stats.toggles));
                ui.label(frame_line(&stats.passes));
                ui.separator();
                for (keys, action) in KEY_HELP {
                    ui.label(
                        egui::RichText::new(format!("{:<9} {}", keys, action))
                            .monospace()
                            .color(egui::Color32::GRAY),
                    );
                }
            });
    }
}

fn scene_line(stats: &HudStats) -> String {
    format!(
        "Scene {}/{}: {}",
        stats.toggles.active_scene() + 1,
        stats.toggles.scene_count(),
        stats.scene_name
    )
}

fn pass_line(toggles: &ToggleState) -> String {
    let flag = |on: bool| if on { "on" } else { "off" };
    format!(
        "solid: {}  wireframe: {}",
        flag(toggles.show_solid),
        flag(toggles.show_wireframe)
    )
}

fn frame_line(passes: &[PassKind]) -> String {
    if passes.is_empty() {
        return "drawn: nothing".to_string();
    }
    let names: Vec<_> = passes.iter().map(|p| p.name()).collect();
    format!("drawn: {}", names.join(" + "))
}

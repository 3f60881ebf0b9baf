use std::collections::HashMap;
use std::num::NonZeroU64;
use std::sync::Arc;

use wgpu::util::DeviceExt;
use wgpu::{
    BindGroup, BindGroupLayout, Buffer, CommandEncoder, Device, Queue, RenderPipeline, Surface, SurfaceConfiguration,
    SurfaceTexture, TextureView,
};
use winit::window::Window;

use super::backend::{DrawCommand, PassBackend};
use super::gpu_context::GpuContext;
use super::pass::{PassKind, RasterKey, RasterState};
use crate::error::{GraphicsError, StartupError};
use crate::scene::{GeometryLibrary, MaterialId, MaterialLibrary};
use crate::types::{DrawUniform, Vertex};

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Initial number of draws the uniform buffer can hold per pass; grows on demand
const INITIAL_UNIFORM_SLOTS: u64 = 64;

/// Where overlay drawing (the HUD) records its commands
pub struct OverlayTarget<'a> {
    pub device: &'a Device,
    pub queue: &'a Queue,
    pub encoder: &'a mut CommandEncoder,
    pub view: &'a TextureView,
    pub size: [u32; 2],
}

struct GpuMesh {
    vertex_buffer: Buffer,
    index_buffer: Buffer,
    index_count: u32,
}

struct OpenPass {
    kind: PassKind,
    raster: RasterKey,
    draws: Vec<DrawCommand>,
}

struct Frame {
    texture: SurfaceTexture,
    view: TextureView,
    pending_clear: Option<wgpu::Color>,
    open_pass: Option<OpenPass>,
}

/// wgpu implementation of [`PassBackend`] drawing into a window surface
///
/// Every pass is encoded and submitted on its own. The first pass of a frame
/// carries the clear; if no pass runs the clear is flushed at present time.
pub struct SurfaceRenderer {
    gpu: GpuContext,
    surface: Surface<'static>,
    surface_config: SurfaceConfiguration,
    depth_view: TextureView,
    uniform_layout: BindGroupLayout,
    uniform_buffer: Buffer,
    uniform_bind_group: BindGroup,
    uniform_stride: u64,
    uniform_slots: u64,
    meshes: Vec<GpuMesh>,
    pipelines: HashMap<(MaterialId, RasterKey), RenderPipeline>,
    frame: Option<Frame>,
}

impl SurfaceRenderer {
    /// Create a surface, device and depth buffer for a window
    pub fn new(window: Arc<Window>) -> Result<Self, GraphicsError> {
        let size = window.inner_size();
        let width = size.width.max(1);
        let height = size.height.max(1);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .map_err(|e| GraphicsError::Device(format!("Failed to create surface: {}", e)))?;
        let gpu = pollster::block_on(GpuContext::new_with_surface(&instance, &surface))?;

        let surface_caps = surface.get_capabilities(gpu.adapter());
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| GraphicsError::Device("Surface reports no supported formats".to_string()))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let surface_config = SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(gpu.device(), &surface_config);
        log::info!("Surface configured: {}x{} {:?}", width, height, surface_format);

        let depth_view = Self::create_depth_view(gpu.device(), width, height);
        let uniform_layout = Self::create_uniform_layout(gpu.device());
        let uniform_stride = uniform_stride(gpu.device().limits().min_uniform_buffer_offset_alignment);
        let (uniform_buffer, uniform_bind_group) =
            Self::create_uniforms(gpu.device(), &uniform_layout, uniform_stride, INITIAL_UNIFORM_SLOTS);

        Ok(Self {
            gpu,
            surface,
            surface_config,
            depth_view,
            uniform_layout,
            uniform_buffer,
            uniform_bind_group,
            uniform_stride,
            uniform_slots: INITIAL_UNIFORM_SLOTS,
            meshes: Vec::new(),
            pipelines: HashMap::new(),
            frame: None,
        })
    }

    pub fn gpu(&self) -> &GpuContext {
        &self.gpu
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.surface_config.format
    }

    /// Uploads every mesh of the library; `GeometryId`s index the uploaded list
    pub fn upload_geometry(&mut self, library: &GeometryLibrary) {
        let device = self.gpu.device();
        self.meshes = library
            .iter()
            .map(|(id, mesh)| GpuMesh {
                vertex_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{} Vertices ({:?})", mesh.name, id)),
                    contents: bytemuck::cast_slice(&mesh.vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                }),
                index_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{} Indices ({:?})", mesh.name, id)),
                    contents: bytemuck::cast_slice(&mesh.indices),
                    usage: wgpu::BufferUsages::INDEX,
                }),
                index_count: mesh.indices.len() as u32,
            })
            .collect();
        log::info!("Uploaded {} meshes", self.meshes.len());
    }

    /// Compiles every material and builds its pipeline for both passes.
    ///
    /// Shader and pipeline validation errors are captured per material and
    /// reported as [`StartupError::ShaderCompilation`].
    pub fn build_pipelines(&mut self, materials: &MaterialLibrary) -> Result<(), StartupError> {
        let device = self.gpu.device();
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Draw Pipeline Layout"),
            bind_group_layouts: &[&self.uniform_layout],
            push_constant_ranges: &[],
        });

        for (id, material) in materials.iter() {
            device.push_error_scope(wgpu::ErrorFilter::Validation);
            let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(&material.name),
                source: wgpu::ShaderSource::Wgsl(material.source.clone()),
            });
            let built: Vec<_> = PassKind::ALL
                .iter()
                .map(|pass| {
                    let raster = pass.raster_state();
                    let pipeline = Self::create_pipeline(
                        device,
                        &pipeline_layout,
                        &shader,
                        self.surface_config.format,
                        &raster,
                        &format!("{} {}", material.name, pass),
                    );
                    (raster.key(), pipeline)
                })
                .collect();

            if let Some(error) = pollster::block_on(device.pop_error_scope()) {
                return Err(StartupError::ShaderCompilation {
                    material: material.name.clone(),
                    message: error.to_string(),
                });
            }
            for (key, pipeline) in built {
                self.pipelines.insert((id, key), pipeline);
            }
            log::debug!("Built pipelines for material '{}'", material.name);
        }

        log::info!("Built {} pipelines", self.pipelines.len());
        Ok(())
    }

    /// Reconfigures the surface and depth buffer. Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(self.gpu.device(), &self.surface_config);
        self.depth_view = Self::create_depth_view(self.gpu.device(), width, height);
    }

    /// Records overlay commands on top of whatever the frame holds so far
    pub fn draw_overlay<F>(&mut self, draw: F) -> Result<(), GraphicsError>
    where
        F: FnOnce(OverlayTarget<'_>),
    {
        self.flush_clear()?;
        let frame = self.frame.as_ref().ok_or(GraphicsError::NoFrame)?;
        if frame.open_pass.is_some() {
            return Err(GraphicsError::PassAlreadyOpen);
        }

        let device = self.gpu.device();
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Overlay Encoder"),
        });
        draw(OverlayTarget {
            device,
            queue: self.gpu.queue(),
            encoder: &mut encoder,
            view: &frame.view,
            size: [self.surface_config.width, self.surface_config.height],
        });
        self.gpu.queue().submit(Some(encoder.finish()));
        Ok(())
    }

    fn acquire(&mut self) -> Result<SurfaceTexture, GraphicsError> {
        match self.surface.get_current_texture() {
            Ok(texture) => Ok(texture),
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                log::warn!("Surface outdated, reconfiguring");
                self.surface.configure(self.gpu.device(), &self.surface_config);
                Ok(self.surface.get_current_texture()?)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Runs an empty pass if the frame still owes its clear
    fn flush_clear(&mut self) -> Result<(), GraphicsError> {
        let frame = self.frame.as_mut().ok_or(GraphicsError::NoFrame)?;
        let Some(clear) = frame.pending_clear.take() else {
            return Ok(());
        };

        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Clear Encoder"),
            });
        {
            let (color, depth) = attachments(&frame.view, &self.depth_view, Some(clear));
            let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Clear Pass"),
                color_attachments: &color,
                depth_stencil_attachment: Some(depth),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
        }
        self.gpu.queue().submit(Some(encoder.finish()));
        Ok(())
    }

    fn ensure_uniform_slots(&mut self, needed: u64) {
        if needed <= self.uniform_slots {
            return;
        }
        let slots = needed.next_power_of_two();
        log::debug!("Growing draw uniform buffer to {} slots", slots);
        let (buffer, bind_group) =
            Self::create_uniforms(self.gpu.device(), &self.uniform_layout, self.uniform_stride, slots);
        self.uniform_buffer = buffer;
        self.uniform_bind_group = bind_group;
        self.uniform_slots = slots;
    }

    fn create_depth_view(device: &Device, width: u32, height: u32) -> TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    fn create_uniform_layout(device: &Device) -> BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Draw Uniform Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: NonZeroU64::new(std::mem::size_of::<DrawUniform>() as u64),
                },
                count: None,
            }],
        })
    }

    fn create_uniforms(device: &Device, layout: &BindGroupLayout, stride: u64, slots: u64) -> (Buffer, BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Draw Uniforms"),
            size: stride * slots,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Draw Uniform Bind Group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: NonZeroU64::new(std::mem::size_of::<DrawUniform>() as u64),
                }),
            }],
        });
        (buffer, bind_group)
    }

    fn create_pipeline(
        device: &Device,
        layout: &wgpu::PipelineLayout,
        shader: &wgpu::ShaderModule,
        format: wgpu::TextureFormat,
        raster: &RasterState,
        label: &str,
    ) -> RenderPipeline {
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: raster.polygon_mode.into(),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: raster.depth_bias.into(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }
}

impl PassBackend for SurfaceRenderer {
    fn clear(&mut self, color: [f32; 4]) -> Result<(), GraphicsError> {
        if let Some(stale) = self.frame.take() {
            // A frame that was never presented is dropped, not shown
            drop(stale.texture);
        }
        let texture = self.acquire()?;
        let view = texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.frame = Some(Frame {
            texture,
            view,
            pending_clear: Some(to_wgpu_color(color)),
            open_pass: None,
        });
        Ok(())
    }

    fn begin_pass(&mut self, pass: PassKind, raster: &RasterState) -> Result<(), GraphicsError> {
        let frame = self.frame.as_mut().ok_or(GraphicsError::NoFrame)?;
        if frame.open_pass.is_some() {
            return Err(GraphicsError::PassAlreadyOpen);
        }
        frame.open_pass = Some(OpenPass {
            kind: pass,
            raster: raster.key(),
            draws: Vec::new(),
        });
        Ok(())
    }

    fn draw(&mut self, command: &DrawCommand) -> Result<(), GraphicsError> {
        let frame = self.frame.as_mut().ok_or(GraphicsError::NoFrame)?;
        let open = frame.open_pass.as_mut().ok_or(GraphicsError::NoOpenPass)?;
        if command.geometry.0 >= self.meshes.len() {
            return Err(GraphicsError::UnknownGeometry(command.geometry));
        }
        if !self.pipelines.contains_key(&(command.material, open.raster)) {
            return Err(GraphicsError::UnknownMaterial(command.material));
        }
        open.draws.push(*command);
        Ok(())
    }

    fn end_pass(&mut self) -> Result<(), GraphicsError> {
        let open = self
            .frame
            .as_mut()
            .ok_or(GraphicsError::NoFrame)?
            .open_pass
            .take()
            .ok_or(GraphicsError::NoOpenPass)?;

        self.ensure_uniform_slots(open.draws.len() as u64);
        let stride = self.uniform_stride as usize;
        let mut uniforms = vec![0u8; stride * open.draws.len()];
        for (slot, command) in uniforms.chunks_exact_mut(stride).zip(&open.draws) {
            let bytes = bytemuck::bytes_of(&command.uniform);
            slot[..bytes.len()].copy_from_slice(bytes);
        }

        let device = self.gpu.device();
        let queue = self.gpu.queue();
        if !uniforms.is_empty() {
            queue.write_buffer(&self.uniform_buffer, 0, &uniforms);
        }

        let frame = self.frame.as_mut().ok_or(GraphicsError::NoFrame)?;
        let clear = frame.pending_clear.take();
        let label = format!("{} Pass", open.kind);

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some(&label),
        });
        {
            let (color, depth) = attachments(&frame.view, &self.depth_view, clear);
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some(&label),
                color_attachments: &color,
                depth_stencil_attachment: Some(depth),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            for (slot, command) in open.draws.iter().enumerate() {
                // Checked when the draw was recorded
                let (Some(pipeline), Some(mesh)) = (
                    self.pipelines.get(&(command.material, open.raster)),
                    self.meshes.get(command.geometry.0),
                ) else {
                    continue;
                };
                let offset = (slot as u64 * self.uniform_stride) as u32;
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(0, &self.uniform_bind_group, &[offset]);
                render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }
        queue.submit(Some(encoder.finish()));

        match pollster::block_on(device.pop_error_scope()) {
            Some(error) => Err(GraphicsError::Validation(error.to_string())),
            None => Ok(()),
        }
    }

    fn present(&mut self) -> Result<(), GraphicsError> {
        self.flush_clear()?;
        let frame = self.frame.take().ok_or(GraphicsError::NoFrame)?;
        if frame.open_pass.is_some() {
            return Err(GraphicsError::PassAlreadyOpen);
        }
        frame.texture.present();
        Ok(())
    }
}

/// Uniform slot size: the draw block rounded up to the device's offset alignment
pub fn uniform_stride(alignment: u32) -> u64 {
    let size = std::mem::size_of::<DrawUniform>() as u64;
    let alignment = u64::from(alignment.max(1));
    size.div_ceil(alignment) * alignment
}

fn to_wgpu_color(color: [f32; 4]) -> wgpu::Color {
    wgpu::Color {
        r: f64::from(color[0]),
        g: f64::from(color[1]),
        b: f64::from(color[2]),
        a: f64::from(color[3]),
    }
}

/// Color + depth attachments; `clear` decides between clearing and loading both
fn attachments<'a>(
    view: &'a TextureView,
    depth_view: &'a TextureView,
    clear: Option<wgpu::Color>,
) -> (
    [Option<wgpu::RenderPassColorAttachment<'a>>; 1],
    wgpu::RenderPassDepthStencilAttachment<'a>,
) {
    let (color_load, depth_load) = match clear {
        Some(color) => (wgpu::LoadOp::Clear(color), wgpu::LoadOp::Clear(1.0)),
        None => (wgpu::LoadOp::Load, wgpu::LoadOp::Load),
    };
    let color = wgpu::RenderPassColorAttachment {
        view,
        resolve_target: None,
        ops: wgpu::Operations {
            load: color_load,
            store: wgpu::StoreOp::Store,
        },
        depth_slice: None,
    };
    let depth = wgpu::RenderPassDepthStencilAttachment {
        view: depth_view,
        depth_ops: Some(wgpu::Operations {
            load: depth_load,
            store: wgpu::StoreOp::Store,
        }),
        stencil_ops: None,
    };
    ([Some(color)], depth)
}

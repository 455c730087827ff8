//! WGPU-based graphics engine
//!
//! Implements [`GraphicsEngine`] on top of wgpu. Draws are recorded between
//! [`GraphicsEngine::clear_buffers`] and
//! [`GraphicsEngine::display_color_buffer`]; the latter encodes one render
//! pass for the recorded meshes, one overlay pass for the recorded text, and
//! presents the surface.

use std::{collections::HashMap, path::Path, sync::Arc};

use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::{
    error::SetupError,
    gfx::{
        geometry::MeshData,
        resources::{
            constant_buffer::{BufferId, ConstantBuffer},
            texture_resource::TextureResource,
        },
        scene::node::Visual,
    },
    ui::{OverlayText, UiManager},
    wgpu_utils::{uniform_entry, UniformBuffer},
};

use super::{
    engine::{GraphicsEngine, MeshId, ProgramId},
    pipeline_manager::{PipelineConfig, PipelineManager},
};

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
}

#[derive(Debug, Clone, Copy)]
struct DrawCommand {
    program: ProgramId,
    mesh: MeshId,
    pvw_matrix: BufferId,
    parameters: BufferId,
}

pub struct RenderEngine {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    format: wgpu::TextureFormat,
    pipeline_manager: PipelineManager,
    wire_layout: wgpu::BindGroupLayout,
    programs: Vec<String>,
    meshes: Vec<GpuMesh>,
    uniforms: HashMap<BufferId, UniformBuffer>,
    bind_groups: HashMap<(BufferId, BufferId), wgpu::BindGroup>,
    clear_color: wgpu::Color,
    draws: Vec<DrawCommand>,
    texts: Vec<OverlayText>,
    ui_manager: UiManager,
}

impl RenderEngine {
    /// Creates the surface, device and overlay for `window`.
    pub async fn new(window: Arc<Window>) -> Result<RenderEngine, SetupError> {
        let (width, height): (u32, u32) = window.inner_size().into();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window.clone())
            .map_err(|e| SetupError::Surface(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| SetupError::Adapter)?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|e| SetupError::Device(e.to_string()))?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or_else(|| SetupError::Surface("surface reports no formats".to_string()))?;
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
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let wire_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Wire Bind Group Layout"),
            entries: &[uniform_entry(0), uniform_entry(1)],
        });

        let mut ui_manager = UiManager::new(&device, &queue, format, &window);
        ui_manager.update_display_size(config.width, config.height);

        let device: Arc<wgpu::Device> = device.into();
        let queue: Arc<wgpu::Queue> = queue.into();
        let pipeline_manager = PipelineManager::new(device.clone());

        log::info!(
            "Render engine ready: {}x{} {:?} on {}",
            config.width,
            config.height,
            format,
            adapter.get_info().name
        );

        Ok(RenderEngine {
            window,
            surface,
            device,
            queue,
            config,
            depth_texture,
            format,
            pipeline_manager,
            wire_layout,
            programs: Vec::new(),
            meshes: Vec::new(),
            uniforms: HashMap::new(),
            bind_groups: HashMap::new(),
            clear_color: wgpu::Color::BLACK,
            draws: Vec::new(),
            texts: Vec::new(),
            ui_manager,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
        self.ui_manager.update_display_size(width, height);
    }

    pub fn get_surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    // Bind groups are keyed by the buffer pair they expose.
    fn prepare_bind_groups(&mut self) {
        for draw in &self.draws {
            let key = (draw.pvw_matrix, draw.parameters);
            if self.bind_groups.contains_key(&key) {
                continue;
            }
            let (Some(pvw), Some(parameters)) = (
                self.uniforms.get(&draw.pvw_matrix),
                self.uniforms.get(&draw.parameters),
            ) else {
                continue;
            };
            let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Wire Bind Group"),
                layout: &self.wire_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: pvw.binding_resource(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: parameters.binding_resource(),
                    },
                ],
            });
            self.bind_groups.insert(key, bind_group);
        }
    }

    fn acquire_frame(&mut self) -> Option<wgpu::SurfaceTexture> {
        match self.surface.get_current_texture() {
            Ok(frame) => Some(frame),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                None
            }
            Err(error) => {
                log::warn!("Dropping frame: {error}");
                None
            }
        }
    }
}

impl GraphicsEngine for RenderEngine {
    fn create_program(&mut self, path: &Path) -> Result<ProgramId, SetupError> {
        let source = std::fs::read_to_string(path).map_err(|source| SetupError::ShaderRead {
            path: path.to_path_buf(),
            source,
        })?;

        let id = ProgramId::new(self.programs.len());
        let name = format!("{}#{}", path.display(), id.index());
        let creation_error = |message: String| SetupError::ProgramCreation {
            path: path.to_path_buf(),
            message,
        };

        self.pipeline_manager
            .load_shader(&name, &source)
            .map_err(creation_error)?;
        let config = PipelineConfig::default()
            .with_label(&name)
            .with_shader(&name)
            .with_cull_mode(None)
            .with_bind_group_layouts(vec![self.wire_layout.clone()])
            .with_depth_format(TextureResource::DEPTH_FORMAT)
            .with_color_format(self.format);
        self.pipeline_manager
            .create_pipeline(&name, &config)
            .map_err(creation_error)?;

        log::info!("Created program {} from {}", id.index(), path.display());
        self.programs.push(name);
        Ok(id)
    }

    fn create_mesh(&mut self, mesh: &MeshData) -> MeshId {
        let vertices = mesh.to_wire_vertices();
        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Wire Vertex Buffer"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let id = MeshId::new(self.meshes.len());
        self.meshes.push(GpuMesh {
            vertex_buffer,
            vertex_count: vertices.len() as u32,
        });
        id
    }

    fn set_clear_color(&mut self, color: [f32; 4]) {
        self.clear_color = wgpu::Color {
            r: color[0] as f64,
            g: color[1] as f64,
            b: color[2] as f64,
            a: color[3] as f64,
        };
    }

    fn clear_buffers(&mut self) {
        self.draws.clear();
        self.texts.clear();
    }

    fn update(&mut self, id: BufferId, buffer: &ConstantBuffer) {
        let size = buffer.size() as u64;
        let stale = self.uniforms.get(&id).is_some_and(|u| u.size() != size);
        if stale {
            self.uniforms.remove(&id);
            self.bind_groups.retain(|(pvw, params), _| *pvw != id && *params != id);
        }

        let device = &self.device;
        let uniform = self
            .uniforms
            .entry(id)
            .or_insert_with(|| UniformBuffer::new(device, buffer.label(), buffer.size()));
        uniform.update_content(&self.queue, buffer.data());
    }

    fn draw(&mut self, visual: &Visual) {
        self.draws.push(DrawCommand {
            program: visual.effect.program,
            mesh: visual.mesh,
            pvw_matrix: visual.effect.pvw_matrix,
            parameters: visual.effect.parameters,
        });
    }

    fn draw_text(&mut self, x: i32, y: i32, color: [f32; 4], text: &str) {
        self.texts.push(OverlayText {
            x: x as f32,
            y: y as f32,
            color,
            text: text.to_string(),
        });
    }

    fn display_color_buffer(&mut self) {
        self.prepare_bind_groups();

        let Some(surface_texture) = self.acquire_frame() else {
            return;
        };
        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Wire Mesh Pass"),
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

            for draw in &self.draws {
                let pipeline = self
                    .programs
                    .get(draw.program.index())
                    .and_then(|name| self.pipeline_manager.get_pipeline(name));
                let mesh = self.meshes.get(draw.mesh.index());
                let bind_group = self.bind_groups.get(&(draw.pvw_matrix, draw.parameters));

                let (Some(pipeline), Some(mesh), Some(bind_group)) = (pipeline, mesh, bind_group)
                else {
                    log::debug!("Skipping draw with missing resources: {draw:?}");
                    continue;
                };

                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(0, bind_group, &[]);
                render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                render_pass.draw(0..mesh.vertex_count, 0..1);
            }
        }

        if !self.texts.is_empty() {
            self.ui_manager.draw_texts(
                &self.device,
                &self.queue,
                &mut encoder,
                &self.window,
                &surface_texture_view,
                &self.texts,
            );
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        self.window.pre_present_notify();
        surface_texture.present();

        self.draws.clear();
        self.texts.clear();
    }

    fn has_depth_range_01(&self) -> bool {
        true
    }
}

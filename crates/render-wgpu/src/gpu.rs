use crate::backdrop::StarBackdrop;
use crate::shaders;
use crate::uniforms::{self, ObjectUniforms};
use starlight_assets::{MeshData, Vertex};
use starlight_render::{Frame, MeshHandle, PerObjectConstants, RenderCommand, RenderError, Renderer};
use wgpu::util::DeviceExt;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Presentation settings chosen at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceOptions {
    pub vsync: bool,
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        Self { vsync: true }
    }
}

fn present_mode(vsync: bool) -> wgpu::PresentMode {
    if vsync {
        wgpu::PresentMode::AutoVsync
    } else {
        wgpu::PresentMode::AutoNoVsync
    }
}

fn clear_color(c: [f32; 4]) -> wgpu::Color {
    wgpu::Color {
        r: c[0] as f64,
        g: c[1] as f64,
        b: c[2] as f64,
        a: c[3] as f64,
    }
}

/// Run `create` inside validation and out-of-memory error scopes.
pub(crate) fn scoped<T>(
    device: &wgpu::Device,
    label: &str,
    create: impl FnOnce() -> T,
) -> Result<T, RenderError> {
    device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = create();
    let validation = pollster::block_on(device.pop_error_scope());
    let out_of_memory = pollster::block_on(device.pop_error_scope());
    match validation.or(out_of_memory) {
        Some(err) => Err(RenderError::ResourceCreation {
            label: label.to_string(),
            message: err.to_string(),
        }),
        None => Ok(value),
    }
}

/// Device-side resources for one uploaded mesh.
struct GpuMesh {
    label: String,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

/// wgpu-based renderer.
///
/// Field order is drop order: mesh and pipeline resources go before the
/// surface, queue and device they were created from.
pub struct WgpuRenderer {
    meshes: Vec<GpuMesh>,
    objects: ObjectUniforms,
    draw_constants: Vec<PerObjectConstants>,
    backdrop: StarBackdrop,
    mesh_pipeline: wgpu::RenderPipeline,
    object_layout: wgpu::BindGroupLayout,
    depth_view: wgpu::TextureView,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    queue: wgpu::Queue,
    device: wgpu::Device,
}

impl WgpuRenderer {
    /// Create the device, configure `target` as the presentation surface and
    /// build all pipelines. Blocks until the adapter and device are ready.
    pub fn new(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        options: SurfaceOptions,
    ) -> Result<Self, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(target)
            .map_err(|e| RenderError::Surface(e.to_string()))?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or(RenderError::AdapterUnavailable)?;

        let info = adapter.get_info();
        tracing::info!(
            adapter = %info.name,
            backend = info.backend.to_str(),
            "selected graphics adapter"
        );

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("starlight_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .map_err(|e| RenderError::Device(e.to_string()))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or(surface_caps.formats.first())
            .copied()
            .ok_or_else(|| RenderError::Surface("surface reports no formats".into()))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: width.max(1),
            height: height.max(1),
            present_mode: present_mode(options.vsync),
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        scoped(&device, "surface configuration", || {
            surface.configure(&device, &config)
        })?;

        let object_layout = scoped(&device, "object bind group layout", || {
            uniforms::create_layout(&device)
        })?;
        let objects = ObjectUniforms::new(&device, &object_layout)?;

        let mesh_pipeline = scoped(&device, "mesh pipeline", || {
            Self::create_mesh_pipeline(&device, &object_layout, surface_format)
        })?;

        let backdrop = scoped(&device, "backdrop", || {
            StarBackdrop::new(&device, surface_format, DEPTH_FORMAT)
        })?;

        let depth_view = scoped(&device, "depth target", || {
            Self::create_depth_texture(&device, config.width, config.height)
        })?;

        tracing::info!(
            width = config.width,
            height = config.height,
            format = ?surface_format,
            vsync = options.vsync,
            "renderer initialized"
        );

        Ok(Self {
            meshes: Vec::new(),
            objects,
            draw_constants: Vec::new(),
            backdrop,
            mesh_pipeline,
            object_layout,
            depth_view,
            surface,
            config,
            queue,
            device,
        })
    }

    fn create_mesh_pipeline(
        device: &wgpu::Device,
        object_layout: &wgpu::BindGroupLayout,
        surface_format: wgpu::TextureFormat,
    ) -> wgpu::RenderPipeline {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("mesh_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::MESH_SHADER.into()),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("mesh_pipeline_layout"),
            bind_group_layouts: &[object_layout],
            push_constant_ranges: &[],
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("mesh_pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                        1 => Float32x3,
                        2 => Float32x3,
                    ],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            // OBJ winding varies between exporters, so nothing is culled.
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        })
    }

    fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }

    fn mesh(&self, handle: MeshHandle) -> Result<&GpuMesh, RenderError> {
        self.meshes
            .get(handle.0 as usize)
            .ok_or(RenderError::UnknownMesh(handle))
    }
}

impl Renderer for WgpuRenderer {
    fn upload_mesh(&mut self, label: &str, mesh: &MeshData) -> Result<MeshHandle, RenderError> {
        if mesh.is_empty() {
            return Err(RenderError::EmptyMesh(label.to_string()));
        }

        let device = &self.device;
        let gpu_mesh = scoped(device, label, || {
            let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label}_vertex_buffer")),
                contents: bytemuck::cast_slice(&mesh.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
            let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label}_index_buffer")),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
            GpuMesh {
                label: label.to_string(),
                vertex_buffer,
                index_buffer,
                index_count: mesh.indices.len() as u32,
            }
        })?;

        let handle = MeshHandle(self.meshes.len() as u32);
        tracing::debug!(
            label,
            ?handle,
            vertices = mesh.vertices.len(),
            indices = mesh.indices.len(),
            "uploaded mesh"
        );
        self.meshes.push(gpu_mesh);
        Ok(handle)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.depth_view =
            Self::create_depth_texture(&self.device, self.config.width, self.config.height);
        tracing::debug!(
            width = self.config.width,
            height = self.config.height,
            "resized render targets"
        );
    }

    fn submit(&mut self, frame: &Frame) -> Result<(), RenderError> {
        let (clear, draws) = frame.validate()?;

        self.draw_constants.clear();
        for command in draws {
            if let RenderCommand::DrawMesh { mesh, constants } = command {
                self.mesh(*mesh)?;
                self.draw_constants.push(*constants);
            }
        }
        self.objects
            .write(&self.device, &self.object_layout, &self.queue, &self.draw_constants)?;

        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::warn!("surface lost or outdated, reconfiguring and skipping frame");
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                tracing::warn!("surface acquire timed out, skipping frame");
                return Ok(());
            }
            Err(e) => return Err(RenderError::Surface(e.to_string())),
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color(clear)),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            let mut slot = 0;
            for command in draws {
                match command {
                    RenderCommand::DrawBackdrop => self.backdrop.draw(&mut pass),
                    RenderCommand::DrawMesh { mesh, .. } => {
                        let gpu_mesh = self.mesh(*mesh)?;
                        pass.set_pipeline(&self.mesh_pipeline);
                        pass.set_bind_group(
                            0,
                            self.objects.bind_group(),
                            &[self.objects.offset(slot)],
                        );
                        slot += 1;
                        pass.set_vertex_buffer(0, gpu_mesh.vertex_buffer.slice(..));
                        pass.set_index_buffer(
                            gpu_mesh.index_buffer.slice(..),
                            wgpu::IndexFormat::Uint32,
                        );
                        pass.draw_indexed(0..gpu_mesh.index_count, 0, 0..1);
                    }
                    // `validate` keeps these out of the draw list.
                    RenderCommand::Clear { .. } | RenderCommand::Present => {}
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

impl Drop for WgpuRenderer {
    fn drop(&mut self) {
        let labels: Vec<&str> = self.meshes.iter().map(|m| m.label.as_str()).collect();
        tracing::debug!(?labels, "releasing GPU resources");
    }
}

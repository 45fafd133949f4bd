//! GPU context of the viewer.
//!
//! [`Context`] owns the surface, the device and every GPU resource the orrery
//! needs: the uploaded scene buffer, a per-draw instance buffer, the projection
//! uniform and one bind group per loaded texture. It implements [`DrawTarget`],
//! so a frame planned by the [`FrameRenderer`](crate::render::FrameRenderer) is
//! replayed into a single render pass.

use std::{collections::HashMap, iter, sync::Arc};

use anyhow::Context as _;
use cgmath::{Matrix4, SquareMatrix};
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::{
    data_structures::{
        instance::DrawRaw,
        mesh::Primitive,
        scene_buffer::{SceneBuffer, TextureRef},
        texture::{self, Texture},
    },
    pipelines::basic::{GlobalsUniform, Pipelines, globals_bind_group_layout, mk_basic_pipelines},
    render::{DrawCall, DrawTarget},
    resources::texture::DecodedTexture,
};

#[derive(Debug)]
pub struct Context {
    pub(crate) window: Arc<Window>,
    pub(crate) depth_texture: Texture,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub clear_colour: wgpu::Color,
    is_surface_configured: bool,
    pipelines: Pipelines,
    vertex_buffer: wgpu::Buffer,
    vertex_count: usize,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    texture_layout: wgpu::BindGroupLayout,
    default_sampler: wgpu::Sampler,
    placeholder: wgpu::BindGroup,
    textures: HashMap<TextureRef, wgpu::BindGroup>,
    projection: Matrix4<f32>,
    pending: Vec<DrawCall>,
}

impl Context {
    /// Sets up the device for `window` and uploads the packed scene once.
    pub async fn new(
        window: Arc<Window>,
        scene: &SceneBuffer,
        clear_colour: [f64; 4],
    ) -> anyhow::Result<Self> {
        let size = window.inner_size();

        log::info!("WGPU setup");
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("device and queue");
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                ..Default::default()
            })
            .await?;

        let mut config = surface
            .get_default_config(&adapter, size.width.max(1), size.height.max(1))
            .context("surface is not supported by the adapter")?;
        // Textures are uploaded as sRGB, so the surface has to be sRGB as well.
        let surface_caps = surface.get_capabilities(&adapter);
        if let Some(format) = surface_caps.formats.iter().copied().find(|f| f.is_srgb()) {
            config.format = format;
        }

        let globals_layout = globals_bind_group_layout(&device);
        let texture_layout = texture::texture_bind_group_layout(&device);
        let pipelines = mk_basic_pipelines(&device, &config, &globals_layout, &texture_layout);

        let vertices = scene.interleaved();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Scene Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        log::info!("uploaded {} scene vertices", vertices.len());

        let instance_capacity = 64;
        let instance_buffer = create_instance_buffer(&device, instance_capacity);

        let projection = Matrix4::identity();
        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Globals Buffer"),
            contents: bytemuck::cast_slice(&[GlobalsUniform::new(&projection)]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
            label: Some("globals_bind_group"),
        });

        let default_sampler = texture::create_default_sampler(&device);
        let placeholder = Texture::create_placeholder(&device, &queue).bind_group(
            &device,
            &texture_layout,
            &default_sampler,
        );

        let depth_texture =
            Texture::create_depth_texture(&device, [config.width, config.height], "depth_texture");

        let [r, g, b, a] = clear_colour;
        Ok(Self {
            window,
            depth_texture,
            surface,
            device,
            queue,
            config,
            clear_colour: wgpu::Color { r, g, b, a },
            is_surface_configured: false,
            pipelines,
            vertex_buffer,
            vertex_count: vertices.len(),
            instance_buffer,
            instance_capacity,
            globals_buffer,
            globals_bind_group,
            texture_layout,
            default_sampler,
            placeholder,
            textures: HashMap::new(),
            projection,
            pending: Vec::new(),
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            self.depth_texture = Texture::create_depth_texture(
                &self.device,
                [self.config.width, self.config.height],
                "depth_texture",
            );
            self.is_surface_configured = true;
        }
    }

    /// Replaces the placeholder of `decoded.texture` with the real map.
    pub fn install_texture(&mut self, decoded: DecodedTexture) {
        let texture = Texture::from_rgba(
            &self.device,
            &self.queue,
            &decoded.rgba,
            Some(decoded.texture.name()),
        );
        let bind_group = texture.bind_group(&self.device, &self.texture_layout, &self.default_sampler);
        log::info!("texture {} ready", decoded.texture.name());
        self.textures.insert(decoded.texture, bind_group);
    }

    fn texture_bind_group(&self, texture: Option<&TextureRef>) -> &wgpu::BindGroup {
        texture
            .and_then(|texture| self.textures.get(texture))
            .unwrap_or(&self.placeholder)
    }

    fn upload_draws(&mut self) {
        let raws: Vec<DrawRaw> = self.pending.iter().map(DrawRaw::from).collect();
        if raws.len() > self.instance_capacity {
            self.instance_capacity = raws.len().next_power_of_two();
            self.instance_buffer = create_instance_buffer(&self.device, self.instance_capacity);
        }
        self.queue
            .write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&raws));
        self.queue.write_buffer(
            &self.globals_buffer,
            0,
            bytemuck::cast_slice(&[GlobalsUniform::new(&self.projection)]),
        );
    }

    fn present(&mut self) -> Result<(), wgpu::SurfaceError> {
        // Rendering requires the surface to be configured
        if !self.is_surface_configured {
            return Ok(());
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.upload_draws();

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            if self.vertex_count > 0 && !self.pending.is_empty() {
                render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
                render_pass.set_bind_group(0, &self.globals_bind_group, &[]);

                for (idx, call) in self.pending.iter().enumerate() {
                    let pipeline = match call.primitive {
                        Primitive::Triangles => &self.pipelines.triangles,
                        Primitive::Points => &self.pipelines.points,
                    };
                    render_pass.set_pipeline(pipeline);
                    render_pass.set_bind_group(1, self.texture_bind_group(call.texture.as_ref()), &[]);
                    let instance = idx as u32;
                    render_pass.draw(call.offset..call.offset + call.count, instance..instance + 1);
                }
            }
        }

        self.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

impl DrawTarget for Context {
    fn begin_frame(&mut self, projection: &Matrix4<f32>) {
        self.projection = *projection;
        self.pending.clear();
    }

    fn draw(&mut self, call: &DrawCall) {
        self.pending.push(call.clone());
    }

    fn end_frame(&mut self) {
        match self.present() {
            Ok(()) => {}
            // Reconfigure the surface if it's lost or outdated
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = self.window.inner_size();
                self.resize(size.width, size.height);
            }
            Err(e) => {
                log::error!("Unable to render {}", e);
            }
        }
    }
}

fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Draw Instance Buffer"),
        size: (capacity * std::mem::size_of::<DrawRaw>()) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

use cgmath::Matrix4;

use crate::data_structures::{
    instance::{DrawRaw, Vertex},
    scene_buffer::SceneVertex,
    texture::Texture,
};

/// Uniform shared by every draw of a frame.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalsUniform {
    projection: [[f32; 4]; 4],
}

impl GlobalsUniform {
    pub fn new(projection: &Matrix4<f32>) -> Self {
        Self {
            projection: (*projection).into(),
        }
    }
}

pub fn globals_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some("globals_bind_group_layout"),
    })
}

/// Triangle and point pipelines sharing one layout and shader.
#[derive(Debug)]
pub struct Pipelines {
    pub triangles: wgpu::RenderPipeline,
    pub points: wgpu::RenderPipeline,
}

pub fn mk_basic_pipelines(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    globals_bind_group_layout: &wgpu::BindGroupLayout,
    texture_bind_group_layout: &wgpu::BindGroupLayout,
) -> Pipelines {
    let render_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Render Pipeline Layout"),
        bind_group_layouts: &[globals_bind_group_layout, texture_bind_group_layout],
        immediate_size: 0,
    });

    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Orrery Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("orrery.wgsl").into()),
    });

    // Guides, rings and textures with alpha are blended over what is behind them.
    let blend = Some(wgpu::BlendState::ALPHA_BLENDING);
    let layouts = [SceneVertex::desc(), DrawRaw::desc()];

    let triangles = mk_render_pipeline(
        device,
        &render_pipeline_layout,
        config.format,
        blend,
        Some(Texture::DEPTH_FORMAT),
        &layouts,
        &shader,
        wgpu::PrimitiveTopology::TriangleList,
    );
    let points = mk_render_pipeline(
        device,
        &render_pipeline_layout,
        config.format,
        blend,
        Some(Texture::DEPTH_FORMAT),
        &layouts,
        &shader,
        wgpu::PrimitiveTopology::PointList,
    );

    Pipelines { triangles, points }
}

#[allow(clippy::too_many_arguments)]
pub fn mk_render_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    color_format: wgpu::TextureFormat,
    blend: Option<wgpu::BlendState>,
    depth_format: Option<wgpu::TextureFormat>,
    vertex_layouts: &[wgpu::VertexBufferLayout],
    shader: &wgpu::ShaderModule,
    topology: wgpu::PrimitiveTopology,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        cache: None,
        label: Some(match topology {
            wgpu::PrimitiveTopology::PointList => "Point Pipeline",
            _ => "Triangle Pipeline",
        }),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: vertex_layouts,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // Rings and guides are single-sided quads seen from both sides
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: depth_format.map(|format| wgpu::DepthStencilState {
            format,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview_mask: None,
    })
}

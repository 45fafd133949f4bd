//! Per-draw data for GPU rendering.
//!
//! Every [`DrawCall`] of a frame becomes one [`DrawRaw`] in an instance buffer.
//! A draw then renders its region with the single instance that belongs to it,
//! so the model-view matrix and the texture switch travel with the draw.

use std::mem;

use crate::{data_structures::scene_buffer::SceneVertex, render::DrawCall};

/// Describes how a `#[repr(C)]` type is laid out in a vertex buffer.
pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

impl Vertex for SceneVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<SceneVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/**
 * The raw draw is the actual data stored on the GPU
 */
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawRaw {
    model_view: [[f32; 4]; 4],
    /// `1.0` samples the bound texture, `0.0` uses the vertex colour.
    use_texture: f32,
}

impl From<&DrawCall> for DrawRaw {
    fn from(call: &DrawCall) -> Self {
        Self {
            model_view: call.model_view.into(),
            use_texture: if call.use_texture() { 1.0 } else { 0.0 },
        }
    }
}

/**
 * A mat4 takes up four vertex slots, one per column, followed by the texture switch.
 */
impl Vertex for DrawRaw {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<DrawRaw>() as wgpu::BufferAddress,
            // Advance once per draw, not per vertex
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 4,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 5,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 12]>() as wgpu::BufferAddress,
                    shader_location: 6,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 16]>() as wgpu::BufferAddress,
                    shader_location: 7,
                    format: wgpu::VertexFormat::Float32,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{Matrix4, SquareMatrix};

    use super::*;
    use crate::{
        data_structures::{
            mesh::Primitive,
            scene_buffer::{RegionId, TextureRef},
        },
        render::DrawLayer,
    };

    fn call(texture: Option<TextureRef>) -> DrawCall {
        DrawCall {
            layer: DrawLayer::Planet,
            region: RegionId(0),
            primitive: Primitive::Triangles,
            offset: 0,
            count: 3,
            model_view: Matrix4::identity(),
            texture,
        }
    }

    #[test]
    fn only_textured_draws_switch_to_the_sampled_texel() {
        // colour-only draws never see the placeholder
        assert_eq!(DrawRaw::from(&call(None)).use_texture, 0.0);
        // textured draws sample whatever is bound, placeholder included
        assert_eq!(DrawRaw::from(&call(Some(TextureRef::new("earth.jpg")))).use_texture, 1.0);
    }
}

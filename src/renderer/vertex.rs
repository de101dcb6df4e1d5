//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const SKY_TOP: [f32; 4] = [0.10, 0.14, 0.30, 1.0];
    pub const SKY_BOTTOM: [f32; 4] = [0.25, 0.35, 0.55, 1.0];
    pub const BUCKET: [f32; 4] = [0.55, 0.38, 0.22, 1.0];
    pub const BUCKET_RIM: [f32; 4] = [0.75, 0.55, 0.32, 1.0];
    pub const DROPLET: [f32; 4] = [0.35, 0.70, 1.0, 1.0];
    pub const RESTART: [f32; 4] = [0.2, 0.8, 0.4, 1.0];
    pub const RESTART_ICON: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    /// Letterbox / game over backdrop
    pub const BACKGROUND: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
}

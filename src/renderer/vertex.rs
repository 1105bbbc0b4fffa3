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

/// Colors for wheel elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const BUCKET: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const FILL_TARGET: [f32; 4] = [0.15, 0.35, 0.6, 1.0];
    /// #8ED6FF
    pub const WATER: [f32; 4] = [0.557, 0.839, 1.0, 1.0];
    pub const SPOKE: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const HUB: [f32; 4] = [0.2, 0.2, 0.2, 1.0];
    pub const CHART_PANEL: [f32; 4] = [0.94, 0.94, 0.96, 0.9];
    pub const CHART_AXIS: [f32; 4] = [0.6, 0.6, 0.65, 1.0];
    pub const CHART_LINE: [f32; 4] = [0.85, 0.25, 0.2, 1.0];
}

//! # Vertex — Coloured Shape Geometry
//!
//! Every draw command becomes one quad: four [`ShapeVertex`] corners and six
//! indices. Positions are in screen pixels (origin top-left, y down); the
//! [`ScreenUniform`] maps them to clip space in the vertex shader.
//!
//! ```text
//! ShapeVertex (24 bytes per vertex)
//! ┌──────────────┬────────────────────────┐
//! │ position     │ color                  │
//! │ [f32; 2]     │ [f32; 4]               │
//! │ offset 0     │ offset 8               │
//! │ location(0)  │ location(1)            │
//! └──────────────┴────────────────────────┘
//! ```

use bytemuck::{Pod, Zeroable};

use super::snapshot::{DrawCommand, DrawList};

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ShapeVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl ShapeVertex {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<ShapeVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // position
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x2,
            },
            // color
            wgpu::VertexAttribute {
                offset: 8,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x4,
            },
        ],
    };
}

/// Pixel → clip-space projection uploaded as a uniform buffer.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct ScreenUniform {
    pub view_proj: [[f32; 4]; 4],
}

impl ScreenUniform {
    /// Orthographic projection for a `width × height` pixel surface with the
    /// origin at the top-left.
    pub fn new(width: u32, height: u32) -> Self {
        let proj = glam::Mat4::orthographic_rh(0.0, width as f32, height as f32, 0.0, -1.0, 1.0);
        Self {
            view_proj: proj.to_cols_array_2d(),
        }
    }
}

/// Tessellate a draw list into a vertex and index buffer pair.
pub fn tessellate(list: &DrawList) -> (Vec<ShapeVertex>, Vec<u32>) {
    let mut vertices = Vec::with_capacity(list.len() * 4);
    let mut indices = Vec::with_capacity(list.len() * 6);

    for command in list.commands() {
        let (corners, color) = match *command {
            DrawCommand::Rect { x, y, w, h, color } => {
                ([[x, y], [x + w, y], [x + w, y + h], [x, y + h]], color)
            }
            DrawCommand::Line {
                from,
                to,
                thickness,
                color,
            } => {
                let dx = to.0 - from.0;
                let dy = to.1 - from.1;
                let len = (dx * dx + dy * dy).sqrt();
                if len <= f32::EPSILON {
                    continue;
                }
                // Offset perpendicular to the line by half the thickness.
                let nx = -dy / len * thickness * 0.5;
                let ny = dx / len * thickness * 0.5;
                (
                    [
                        [from.0 + nx, from.1 + ny],
                        [to.0 + nx, to.1 + ny],
                        [to.0 - nx, to.1 - ny],
                        [from.0 - nx, from.1 - ny],
                    ],
                    color,
                )
            }
        };

        let base = vertices.len() as u32;
        let color = color.to_array();
        vertices.extend(corners.iter().map(|&position| ShapeVertex { position, color }));
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    (vertices, indices)
}

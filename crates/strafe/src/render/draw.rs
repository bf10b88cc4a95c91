//! Draw one frame.
//!
//! ```text
//! acquire surface texture
//!   → write screen projection for the current surface size
//!   → upload tessellated DrawList
//!   → clear to (30, 30, 30), draw_indexed
//!   → submit + present
//! ```

use wgpu::util::DeviceExt;

use super::gpu::GpuContext;
use super::pipeline::ShapeRenderer;
use super::snapshot::DrawList;
use super::vertex::{ScreenUniform, tessellate};

pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 30.0 / 255.0,
    g: 30.0 / 255.0,
    b: 30.0 / 255.0,
    a: 1.0,
};

/// Render `list` to the window surface.
pub fn render_frame(
    gpu: &GpuContext,
    renderer: &ShapeRenderer,
    list: &DrawList,
) -> Result<(), wgpu::SurfaceError> {
    let output = gpu.surface.get_current_texture()?;
    let view = output
        .texture
        .create_view(&wgpu::TextureViewDescriptor::default());
    let mut encoder = gpu
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("strafe frame encoder"),
        });

    let (width, height) = gpu.surface_size();
    gpu.queue.write_buffer(
        &renderer.screen_buffer,
        0,
        bytemuck::cast_slice(&[ScreenUniform::new(width, height)]),
    );

    let (vertices, indices) = tessellate(list);
    let buffers = (!indices.is_empty()).then(|| {
        let vertex_buffer = gpu.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("shape vertex buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = gpu.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("shape index buffer"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        (vertex_buffer, index_buffer)
    });

    {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("shape render pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        if let Some((vb, ib)) = &buffers {
            render_pass.set_pipeline(&renderer.pipeline);
            render_pass.set_bind_group(0, &renderer.screen_bind_group, &[]);
            render_pass.set_vertex_buffer(0, vb.slice(..));
            render_pass.set_index_buffer(ib.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..indices.len() as u32, 0, 0..1);
        }
    }

    gpu.queue.submit(std::iter::once(encoder.finish()));
    output.present();
    Ok(())
}

use wgpu::util::DeviceExt;
use wgpu::{Buffer, BufferUsages, Device, RenderPass};

use super::vertex::Vertex;

/// One uploaded primitive plus the bind group for its material.
pub struct GpuMesh {
    vertex_buf: Buffer,
    index_buf:  Buffer,
    index_count: u32,
    material_group: wgpu::BindGroup,
}

impl GpuMesh {
    pub fn new(
        device: &Device,
        vertices: &[Vertex],
        indices:  &[u32],
        material_group: wgpu::BindGroup,
    ) -> Self {
        let vertex_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh vertex buffer"),
            contents: bytemuck::cast_slice(vertices),
            usage: BufferUsages::VERTEX,
        });

        let index_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh index buffer"),
            contents: bytemuck::cast_slice(indices),
            usage: BufferUsages::INDEX,
        });

        Self {
            vertex_buf,
            index_buf,
            index_count: indices.len() as u32,
            material_group,
        }
    }

    pub fn draw(&self, pass: &mut RenderPass<'_>) {
        pass.set_bind_group(1, &self.material_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buf.slice(..));
        pass.set_index_buffer (self.index_buf.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

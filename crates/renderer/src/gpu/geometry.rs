use wgpu::util::DeviceExt;

use crate::mesh::{QUAD_VERTEX_COUNT, QUAD_VERTICES};

/// The full-screen quad uploaded once and never written again.
pub(crate) struct QuadGeometry {
    pub buffer: wgpu::Buffer,
    pub vertex_count: u32,
}

impl QuadGeometry {
    pub fn upload(device: &wgpu::Device) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad vertex buffer"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        Self {
            buffer,
            vertex_count: QUAD_VERTEX_COUNT,
        }
    }
}

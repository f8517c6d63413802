use crate::compile::UniformLocation;

/// Smallest uniform buffer we allocate; std140 blocks round up to 16 bytes.
const MIN_UNIFORM_BLOCK_SIZE: u64 = 16;

/// GPU-side storage for the program's single uniform block.
pub(crate) struct UniformBlock {
    pub layout: wgpu::BindGroupLayout,
    pub bind_group: wgpu::BindGroup,
    buffer: wgpu::Buffer,
    location: UniformLocation,
}

impl UniformBlock {
    /// Allocates a zeroed block matching the group/binding of `location`.
    pub fn new(device: &wgpu::Device, location: UniformLocation) -> Self {
        let size = block_allocation_size(location);
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("cloud uniform buffer"),
            size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("cloud uniform layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: location.binding,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("cloud uniform bind group"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: location.binding,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self {
            layout,
            bind_group,
            buffer,
            location,
        }
    }

    pub fn group(&self) -> u32 {
        self.location.group
    }

    /// Writes one `f32` at the resolved member offset.
    pub fn write_f32(&self, queue: &wgpu::Queue, value: f32) {
        queue.write_buffer(
            &self.buffer,
            u64::from(self.location.offset),
            bytemuck::bytes_of(&value),
        );
    }
}

fn block_allocation_size(location: UniformLocation) -> u64 {
    let needed = u64::from(location.block_size).max(u64::from(location.offset) + 4);
    needed.max(MIN_UNIFORM_BLOCK_SIZE).next_multiple_of(MIN_UNIFORM_BLOCK_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(offset: u32, block_size: u32) -> UniformLocation {
        UniformLocation {
            group: 0,
            binding: 0,
            offset,
            block_size,
        }
    }

    #[test]
    fn single_float_block_rounds_up_to_sixteen_bytes() {
        assert_eq!(block_allocation_size(location(0, 4)), 16);
        assert_eq!(block_allocation_size(location(0, 16)), 16);
    }

    #[test]
    fn allocation_covers_member_offset() {
        assert_eq!(block_allocation_size(location(16, 4)), 32);
        assert_eq!(block_allocation_size(location(0, 36)), 48);
    }
}

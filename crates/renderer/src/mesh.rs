use bytemuck::{Pod, Zeroable};

/// One corner of the full-screen quad.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Clip-space position; no transform is applied in the vertex stage.
    pub position: [f32; 2],
    /// Texture coordinate in `[0, 1]`.
    pub tex_coord: [f32; 2],
}

impl Vertex {
    const fn new(position: [f32; 2], tex_coord: [f32; 2]) -> Self {
        Self {
            position,
            tex_coord,
        }
    }
}

/// Number of vertices submitted by every draw call.
pub const QUAD_VERTEX_COUNT: u32 = 6;

// (-1,1)     (1,1)
//    +---------+
//    |       / |
//    |     /   |
//    |   /     |
//    | /       |
//    +---------+
// (-1,-1)     (1,-1)
/// Two counter-clockwise triangles covering clip space.
pub const QUAD_VERTICES: [Vertex; QUAD_VERTEX_COUNT as usize] = [
    Vertex::new([-1.0, 1.0], [0.0, 1.0]),
    Vertex::new([-1.0, -1.0], [0.0, 0.0]),
    Vertex::new([1.0, -1.0], [1.0, 0.0]),
    Vertex::new([-1.0, 1.0], [0.0, 1.0]),
    Vertex::new([1.0, -1.0], [1.0, 0.0]),
    Vertex::new([1.0, 1.0], [1.0, 1.0]),
];

/// Vertex attributes as seen by the vertex shader (`location = 0` and `1`).
pub(crate) const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2];

/// Buffer layout for [`Vertex`], interleaved position then texture coordinate.
pub(crate) fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRIBUTES,
    }
}

use bytemuck::{Pod, Zeroable};

/// One corner of a textured quad.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub pos: [f32; 2],
    pub uv: [f32; 2],
    /// Premultiplied RGBA tint.
    pub color: [f32; 4],
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2, 2 => Float32x4];

    /// Vertex buffer layout for pipelines consuming recorded quads.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Index pattern for one quad (two triangles).
pub const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

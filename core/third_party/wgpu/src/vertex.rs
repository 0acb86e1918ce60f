/// Describe the vertex structure of a mesh.
///
/// # Fields
///
/// * `position` - The position of the vertex (location 0).
/// * `tex_uv`   - The texture UV of the vertex (location 1).
/// * `normal`   - The normal of the vertex (location 2).
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable, Debug, PartialEq)]
pub struct Vertex {
    pub position: [f32; 3],
    pub tex_uv: [f32; 2],
    pub normal: [f32; 3],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3, // Position
        1 => Float32x2, // UV
        2 => Float32x3, // Normal
    ];

    /// Describe the layout of the vertex.
    ///
    /// # Returns
    ///
    /// * `wgpu::VertexBufferLayout` - The layout of the vertex.
    pub fn describe<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_matches_struct() {
        let layout = Vertex::describe();
        assert_eq!(layout.array_stride, 32);
        assert_eq!(layout.attributes[1].offset, 12);
        assert_eq!(layout.attributes[2].offset, 20);
        assert_eq!(layout.attributes[2].shader_location, 2);
    }
}

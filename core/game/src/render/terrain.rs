use wde_logger::{debug, trace};
use wde_terrain::MeshGrid;
use wde_wgpu::{BindGroupBuilder, Buffer, BufferUsage, Color, CommandBuffer, CullMode, LoadOp, Operations, RenderError, RenderInstance, RenderPipeline, RenderTexture, ShaderType, StoreOp, Texture, Vertex};

use crate::{FrameBindings, GameRenderPass, Scene};

/// The terrain renderer.
/// Owns the GPU copy of the terrain mesh and draws it with a double sided Phong pipeline.
#[derive(Debug)]
pub struct TerrainRenderer {
    label: String,

    // Terrain data
    terrain_vertices: Option<Buffer>,
    terrain_indices: Option<Buffer>,
    terrain_indices_count: u32,

    terrain_pipeline: RenderPipeline,
}

impl TerrainRenderer {
    /// Create the terrain pipeline.
    ///
    /// # Arguments
    ///
    /// * `render_instance` - The render instance
    /// * `camera_layout` - Layout of the camera bind group (group 0)
    /// * `lighting_layout` - Layout of the light and material bind group (group 1)
    /// * `vertex_shader` - WGSL source of the vertex shader
    /// * `fragment_shader` - WGSL source of the fragment shader
    #[tracing::instrument(skip_all)]
    pub fn new(render_instance: &RenderInstance, camera_layout: &BindGroupBuilder, lighting_layout: &BindGroupBuilder,
        vertex_shader: &str, fragment_shader: &str) -> Result<Self, RenderError> {
        let mut terrain_pipeline = RenderPipeline::new("Terrain");
        terrain_pipeline
            .set_shader(vertex_shader, ShaderType::Vertex)
            .set_shader(fragment_shader, ShaderType::Fragment)
            .set_depth_stencil()
            .set_cull_mode(CullMode::None)
            .add_bind_group(camera_layout)
            .add_bind_group(lighting_layout);
        terrain_pipeline.init(render_instance)?;

        Ok(TerrainRenderer {
            label: "Terrain".to_string(),
            terrain_vertices: None,
            terrain_indices: None,
            terrain_indices_count: 0,
            terrain_pipeline,
        })
    }

    /// Convert the terrain mesh to the vertex layout of the pipeline.
    pub fn mesh_vertices(mesh: &MeshGrid) -> Vec<Vertex> {
        mesh.vertices().iter()
            .map(|v| Vertex {
                position: v.position,
                tex_uv: v.uv,
                normal: v.normal,
            })
            .collect()
    }

    /// Upload the terrain mesh if it changed since the last upload.
    ///
    /// # Arguments
    ///
    /// * `render_instance` - The render instance
    /// * `terrain` - The terrain mesh, its dirty flag is cleared
    pub fn update(&mut self, render_instance: &RenderInstance, terrain: &mut MeshGrid) {
        if !terrain.take_dirty() {
            return;
        }
        debug!(vertices = terrain.vertices().len(), indices = terrain.indices().len(), "Uploading terrain mesh.");

        let vertices = Self::mesh_vertices(terrain);
        self.terrain_vertices = Self::upload(render_instance, self.terrain_vertices.take(),
            "'Terrain' Vertex", BufferUsage::VERTEX, bytemuck::cast_slice(&vertices));
        self.terrain_indices = Self::upload(render_instance, self.terrain_indices.take(),
            "'Terrain' Index", BufferUsage::INDEX, bytemuck::cast_slice(terrain.indices()));
        self.terrain_indices_count = terrain.indices().len() as u32;
    }

    /// Write into the current buffer when the size matches, otherwise create a new one.
    fn upload(render_instance: &RenderInstance, current: Option<Buffer>, label: &str, usage: BufferUsage, content: &[u8]) -> Option<Buffer> {
        if content.is_empty() {
            return None;
        }
        match current {
            Some(buffer) if buffer.size() == content.len() as u64 => {
                buffer.write(render_instance, content, 0);
                Some(buffer)
            },
            _ => Some(Buffer::new(render_instance, label, content.len(), usage, Some(content))),
        }
    }
}

impl GameRenderPass for TerrainRenderer {
    fn render(&self, command_buffer: &mut CommandBuffer, render_texture: &RenderTexture, depth_texture: &Texture, bindings: FrameBindings, scene: &Scene) -> Result<(), RenderError> {
        let [r, g, b, a] = scene.clear_color;
        let mut render_pass = command_buffer.create_render_pass(
            &self.label,
            &render_texture.view,
            Some(Operations {
                load: LoadOp::Clear(Color { r, g, b, a }),
                store: StoreOp::Store,
            }),
            Some(&depth_texture.view));

        let (Some(vertices), Some(indices)) = (self.terrain_vertices.as_ref(), self.terrain_indices.as_ref()) else {
            trace!(self.label, "No terrain triangles to draw.");
            return Ok(());
        };

        render_pass
            .set_pipeline(&self.terrain_pipeline)?
            .set_vertex_buffer(0, vertices)
            .set_index_buffer(indices)
            .set_bind_group(0, bindings.camera)
            .set_bind_group(1, bindings.lighting);
        render_pass.draw_indexed(0..self.terrain_indices_count, 0)
    }

    fn label(&self) -> &str {
        &self.label
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use wde_terrain::{build_terrain, ElevationGrid};

    #[test]
    fn converts_mesh_vertices() {
        let grid = ElevationGrid::from_rows(&[vec![0.0, 10.0], vec![20.0, 30.0]]).unwrap();
        let mesh = build_terrain(&grid, 2.0, 2.0, 50.0);
        let vertices = TerrainRenderer::mesh_vertices(&mesh);

        assert_eq!(vertices.len(), 4);
        for (vertex, source) in vertices.iter().zip(mesh.vertices()) {
            assert_eq!(vertex.position, source.position);
            assert_eq!(vertex.normal, source.normal);
            assert_eq!(vertex.tex_uv, source.uv);
        }
        assert_eq!(vertices[3].position, [1.0, 50.0, 1.0]);
    }

    #[test]
    fn vertex_bytes_match_layout() {
        let mesh = MeshGrid::lattice(3, 4, 3.0, 2.0);
        let vertices = TerrainRenderer::mesh_vertices(&mesh);
        let bytes: &[u8] = bytemuck::cast_slice(&vertices);
        assert_eq!(bytes.len(), 12 * std::mem::size_of::<Vertex>());
    }
}

use wde_logger::{debug, trace};
use wde_wgpu::{BindGroup, BindGroupBuilder, Buffer, BufferBindingType, BufferUsage, CommandBuffer, RenderError, RenderInstance, RenderTexture, ShaderStages, Texture};

use crate::{CameraUniform, FrameBindings, GameRenderPass, LightUniform, MaterialUniform, Scene, TerrainRenderer};

/// WGSL sources of the terrain pipeline.
#[derive(Debug, Clone, Copy)]
pub struct TerrainShaders<'a> {
    pub vertex: &'a str,
    pub fragment: &'a str,
}

/// Renders the scene.
/// Owns the frame uniforms, the depth texture and the render passes.
#[derive(Debug)]
pub struct Renderer {
    // Camera buffer
    camera_buffer: Buffer,
    camera_buffer_bg: BindGroup,

    // Light and material buffers
    _light_buffer: Buffer,
    _material_buffer: Buffer,
    lighting_bg: BindGroup,

    // Depth texture
    depth_texture: Texture,

    // Render passes
    terrain: TerrainRenderer,
}

impl Renderer {
    /// Create a new renderer instance.
    ///
    /// # Arguments
    ///
    /// * `render_instance` - The render instance
    /// * `scene` - The scene to render
    /// * `shaders` - The terrain shaders
    ///
    /// # Errors
    ///
    /// The terrain pipeline cannot be created.
    #[tracing::instrument(skip_all)]
    pub fn new(render_instance: &RenderInstance, scene: &Scene, shaders: TerrainShaders) -> Result<Self, RenderError> {
        // ==== Camera ====
        let camera_buffer = Buffer::new(
            render_instance,
            "Camera buffer",
            std::mem::size_of::<CameraUniform>(),
            BufferUsage::UNIFORM,
            Some(bytemuck::bytes_of(&CameraUniform::from_camera(&scene.camera))));
        let mut camera_buffer_bg_build = BindGroupBuilder::new("Camera buffer");
        camera_buffer_bg_build
            .add_buffer(0, &camera_buffer, ShaderStages::VERTEX | ShaderStages::FRAGMENT, BufferBindingType::Uniform);


        // ==== Light and material ====
        // Fixed for the whole run, written once
        let light_buffer = Buffer::new(
            render_instance,
            "Light buffer",
            std::mem::size_of::<LightUniform>(),
            BufferUsage::UNIFORM,
            Some(bytemuck::bytes_of(&LightUniform::from(&scene.light))));
        let material_buffer = Buffer::new(
            render_instance,
            "Material buffer",
            std::mem::size_of::<MaterialUniform>(),
            BufferUsage::UNIFORM,
            Some(bytemuck::bytes_of(&MaterialUniform::from(&scene.material))));
        let mut lighting_bg_build = BindGroupBuilder::new("Lighting buffers");
        lighting_bg_build
            .add_buffer(0, &light_buffer, ShaderStages::FRAGMENT, BufferBindingType::Uniform)
            .add_buffer(1, &material_buffer, ShaderStages::FRAGMENT, BufferBindingType::Uniform);


        // ==== Render passes ====
        let terrain = TerrainRenderer::new(
            render_instance, &camera_buffer_bg_build, &lighting_bg_build, shaders.vertex, shaders.fragment)?;

        let camera_buffer_bg = BindGroup::new(render_instance, camera_buffer_bg_build);
        let lighting_bg = BindGroup::new(render_instance, lighting_bg_build);


        // ==== Depth texture ====
        let depth_texture = Texture::depth(render_instance, "Depth texture", render_instance.surface_size());

        Ok(Renderer {
            camera_buffer,
            camera_buffer_bg,
            _light_buffer: light_buffer,
            _material_buffer: material_buffer,
            lighting_bg,
            depth_texture,
            terrain,
        })
    }

    /// Update the GPU data of the scene before rendering.
    ///
    /// # Arguments
    ///
    /// * `render_instance` - The render instance
    /// * `scene` - The scene, its terrain dirty flag is cleared
    pub fn update(&mut self, render_instance: &RenderInstance, scene: &mut Scene) {
        trace!("Updating camera buffer.");
        self.camera_buffer.write(render_instance, bytemuck::bytes_of(&CameraUniform::from_camera(&scene.camera)), 0);
        self.terrain.update(render_instance, &mut scene.terrain);
    }

    /// Render the scene into the render texture.
    ///
    /// # Arguments
    ///
    /// * `render_instance` - The render instance
    /// * `scene` - The scene to render
    /// * `render_texture` - The surface texture of the frame
    pub fn render(&self, render_instance: &RenderInstance, scene: &Scene, render_texture: &RenderTexture) -> Result<(), RenderError> {
        debug!("Starting render.");

        let mut command_buffer = CommandBuffer::new(render_instance, "Render");
        let bindings = FrameBindings {
            camera: &self.camera_buffer_bg,
            lighting: &self.lighting_bg,
        };

        {
            let _pass_span = tracing::span!(tracing::Level::TRACE, "render_pass", label = self.terrain.label()).entered();
            self.terrain.render(&mut command_buffer, render_texture, &self.depth_texture, bindings, scene)?;
        }

        command_buffer.submit(render_instance);
        Ok(())
    }

    /// Recreate the size dependent targets.
    ///
    /// # Arguments
    ///
    /// * `render_instance` - The render instance
    /// * `width` - The new width
    /// * `height` - The new height
    pub fn resize(&mut self, render_instance: &RenderInstance, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.depth_texture = Texture::depth(render_instance, "Depth texture", (width, height));
    }
}

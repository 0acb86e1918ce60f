use wde_wgpu::{BindGroup, CommandBuffer, RenderError, RenderTexture, Texture};

use crate::Scene;

/// Bind groups shared by every render pass of a frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameBindings<'a> {
    /// Group 0, camera uniform
    pub camera: &'a BindGroup,
    /// Group 1, light and material uniforms
    pub lighting: &'a BindGroup,
}

/// A trait that describes a game render pass.
pub trait GameRenderPass {
    /// Record the render pass.
    ///
    /// # Arguments
    ///
    /// * `command_buffer` - The command buffer of the frame
    /// * `render_texture` - The surface texture to draw into
    /// * `depth_texture` - The depth texture
    /// * `bindings` - The frame bind groups
    /// * `scene` - The scene to render
    fn render(&self, command_buffer: &mut CommandBuffer, render_texture: &RenderTexture, depth_texture: &Texture, bindings: FrameBindings, scene: &Scene) -> Result<(), RenderError>;

    /// Get the label of the render pass.
    fn label(&self) -> &str;
}

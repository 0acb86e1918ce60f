use wde_logger::{trace, debug};

use crate::{RenderInstance, TextureView};

use super::render_pass::RenderPass;

/// Type of a color.
pub type Color = wgpu::Color;

/// Type of a load operation.
pub type LoadOp<V> = wgpu::LoadOp<V>;

/// Type of a store operation.
pub type StoreOp = wgpu::StoreOp;

/// Load and store operations for the color texture.
#[derive(Clone, Copy, Debug)]
pub struct Operations<V> {
    pub load: LoadOp<V>,
    pub store: StoreOp,
}

/// Create a command buffer.
///
/// # Example
///
/// ```ignore
/// let mut command_buffer = CommandBuffer::new(&instance, "Command Buffer");
///
/// // Create a render pass
/// {
///     let mut render_pass = command_buffer.create_render_pass("Render Pass", &color_view, None, Some(&depth_view));
///     (...)
/// }
///
/// // Submit the command buffer
/// command_buffer.submit(&instance);
/// ```
pub struct CommandBuffer {
    pub label: String,
    encoder: wgpu::CommandEncoder,
}

impl std::fmt::Debug for CommandBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandBuffer")
            .field("label", &self.label)
            .finish()
    }
}

impl CommandBuffer {
    /// Create a new command buffer.
    ///
    /// # Arguments
    ///
    /// * `instance` - The render instance.
    /// * `label` - The label of the command buffer.
    pub fn new(instance: &RenderInstance, label: &str) -> Self {
        debug!(label, "Creating command buffer.");

        let encoder = instance.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some(format!("'{}' Command Encoder", label).as_str()),
        });

        Self {
            label: label.to_string(),
            encoder,
        }
    }

    /// Create a new render pass.
    ///
    /// # Arguments
    ///
    /// * `label` - The label of the render pass.
    /// * `color_texture` - The color texture to render to.
    /// * `color_operations` - The color operations. If `None`, clear the color texture to black.
    /// * `depth_texture` - The depth texture to render to, cleared to the far plane.
    pub fn create_render_pass<'pass>(&'pass mut self, label: &str,
        color_texture: &'pass TextureView,
        color_operations: Option<Operations<Color>>,
        depth_texture: Option<&'pass TextureView>) -> RenderPass<'pass> {
        trace!(label, "Creating render pass.");

        let depth_attachment = depth_texture.map(|view| wgpu::RenderPassDepthStencilAttachment {
            view,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(1.0),
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: None,
        });

        let color_operations = color_operations.unwrap_or(Operations {
            load: LoadOp::Clear(Color::BLACK),
            store: StoreOp::Store,
        });

        let render_pass = self.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(format!("'{}' Render Pass", label).as_str()),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_texture,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: color_operations.load,
                    store: color_operations.store,
                },
            })],
            depth_stencil_attachment: depth_attachment,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        RenderPass::new(label, render_pass)
    }

    /// Finish and submit a command buffer.
    ///
    /// # Arguments
    ///
    /// * `instance` - The render instance.
    pub fn submit(self, instance: &RenderInstance) {
        instance.queue.submit(std::iter::once(self.encoder.finish()));
        debug!(self.label, "Submitted command buffer.");
    }
}

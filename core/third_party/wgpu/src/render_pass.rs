use std::ops::Range;

use wde_logger::{error, debug};

use crate::{BindGroup, Buffer, RenderError};

use super::render_pipeline::RenderPipeline;

/// Create a render pass instance.
///
/// # Example
///
/// ```ignore
/// let mut render_pass = command_buffer.create_render_pass(...);
///
/// // Set render pass dependencies
/// render_pass
///     .set_vertex_buffer(0, &vertex_buffer)
///     .set_index_buffer(&index_buffer);
/// render_pass.set_pipeline(&pipeline)?
///     .set_bind_group(0, &camera_bind_group);
///
/// // Render
/// render_pass.draw_indexed(0..index_count, 0)?;
/// ```
pub struct RenderPass<'a> {
    pub label: String,
    render_pass: wgpu::RenderPass<'a>,
    pipeline_set: bool,
    vertex_buffer_set: bool,
    index_buffer_set: bool,
}

impl std::fmt::Debug for RenderPass<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderPass")
            .field("label", &self.label)
            .field("pipeline_set", &self.pipeline_set)
            .field("vertex_buffer_set", &self.vertex_buffer_set)
            .field("index_buffer_set", &self.index_buffer_set)
            .finish()
    }
}

impl<'a> RenderPass<'a> {
    /// Create a new render pass.
    ///
    /// # Arguments
    ///
    /// * `label` - The label of the render pass.
    /// * `render_pass` - The render pass to wrap.
    pub fn new(label: &str, render_pass: wgpu::RenderPass<'a>) -> Self {
        debug!(label, "Creating render pass.");

        Self {
            label: label.to_string(),
            render_pass,
            pipeline_set: false,
            vertex_buffer_set: false,
            index_buffer_set: false,
        }
    }

    /// Set the pipeline of the render pass.
    ///
    /// # Arguments
    ///
    /// * `pipeline` - The pipeline to set.
    ///
    /// # Errors
    ///
    /// * `RenderError::PipelineNotInitialized` - The pipeline is not initialized.
    pub fn set_pipeline(&mut self, pipeline: &'a RenderPipeline) -> Result<&mut Self, RenderError> {
        let Some(pipeline_ref) = pipeline.get_pipeline() else {
            error!(pipeline.label, "Pipeline is not created yet.");
            return Err(RenderError::PipelineNotInitialized);
        };

        self.render_pass.set_pipeline(pipeline_ref);
        self.pipeline_set = true;
        Ok(self)
    }

    /// Set a vertex buffer of the render pass.
    ///
    /// # Arguments
    ///
    /// * `binding` - The binding of the vertex buffer.
    /// * `buffer` - The buffer to set.
    pub fn set_vertex_buffer(&mut self, binding: u32, buffer: &'a Buffer) -> &mut Self {
        self.render_pass.set_vertex_buffer(binding, buffer.buffer.slice(..));
        self.vertex_buffer_set = true;
        self
    }

    /// Set the index buffer of the render pass (32 bits indices).
    ///
    /// # Arguments
    ///
    /// * `buffer` - The buffer to set.
    pub fn set_index_buffer(&mut self, buffer: &'a Buffer) -> &mut Self {
        self.render_pass.set_index_buffer(buffer.buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.index_buffer_set = true;
        self
    }

    /// Set a bind group of the render pass at a binding.
    ///
    /// # Arguments
    ///
    /// * `binding` - The binding of the bind group.
    /// * `bind_group` - The bind group to set.
    pub fn set_bind_group(&mut self, binding: u32, bind_group: &'a BindGroup) -> &mut Self {
        self.render_pass.set_bind_group(binding, &bind_group.group, &[]);
        self
    }

    /// Draws primitives from the active vertex buffers as indexed triangles.
    ///
    /// # Arguments
    ///
    /// * `indices` - Range of indices to draw.
    /// * `instance_index` - Index of the instance to draw.
    ///
    /// # Errors
    ///
    /// * `RenderError::PipelineNotSet` - The pipeline is not set.
    /// * `RenderError::MissingVertexBuffer` - The vertex buffer is not set.
    /// * `RenderError::MissingIndexBuffer` - The index buffer is not set.
    #[tracing::instrument]
    pub fn draw_indexed(&mut self, indices: Range<u32>, instance_index: u32) -> Result<(), RenderError> {
        if !self.pipeline_set {
            error!(self.label, "Pipeline is not set.");
            return Err(RenderError::PipelineNotSet);
        }
        if !self.vertex_buffer_set {
            error!(self.label, "Vertex buffer is not set.");
            return Err(RenderError::MissingVertexBuffer);
        }
        if !self.index_buffer_set {
            error!(self.label, "Index buffer is not set.");
            return Err(RenderError::MissingIndexBuffer);
        }
        self.render_pass.draw_indexed(indices, 0, instance_index..(instance_index+1));
        Ok(())
    }
}

impl Drop for RenderPass<'_> {
    fn drop(&mut self) {
        debug!(self.label, "Dropping render pass.");
    }
}

use wde_logger::{debug, trace};
use wgpu::util::DeviceExt;

use crate::RenderInstance;

/// Buffer usages.
pub type BufferUsage = wgpu::BufferUsages;

/// Buffer binding types.
pub type BufferBindingType = wgpu::BufferBindingType;

/// Create a buffer.
///
/// # Example
///
/// ```ignore
/// let mut buffer = Buffer::new(&instance, "Camera", 64, BufferUsage::UNIFORM, None);
///
/// // Write data to the buffer
/// buffer.write(&instance, bytemuck::cast_slice(&[...]), 0);
/// ```
pub struct Buffer {
    pub label: String,
    pub buffer: wgpu::Buffer,
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("label", &self.label)
            .field("size", &self.buffer.size())
            .finish()
    }
}

impl Buffer {
    /// Create a new buffer.
    /// The buffer can always be written to after creation.
    ///
    /// # Arguments
    ///
    /// * `instance` - The render instance.
    /// * `label` - The label of the buffer.
    /// * `size` - The size of the buffer, ignored if `content` is provided.
    /// * `usage` - The usage of the buffer (vertex, index, uniform...).
    /// * `content` - The initial content of the buffer.
    pub fn new(instance: &RenderInstance, label: &str, size: usize, usage: BufferUsage, content: Option<&[u8]>) -> Self {
        debug!("Creating '{}' Buffer.", label);

        let buffer = match content {
            Some(content) => instance.device.create_buffer_init(
                &wgpu::util::BufferInitDescriptor {
                    label: Some(format!("'{}' Buffer", label).as_str()),
                    contents: content,
                    usage: usage | BufferUsage::COPY_DST,
                }
            ),
            None => instance.device.create_buffer(
                &wgpu::BufferDescriptor {
                    label: Some(format!("'{}' Buffer", label).as_str()),
                    size: size as u64,
                    usage: usage | BufferUsage::COPY_DST,
                    mapped_at_creation: false,
                }
            ),
        };

        Buffer {
            label: label.to_string(),
            buffer,
        }
    }

    /// Write data to the buffer.
    /// The write happens on the next queue submit.
    ///
    /// # Arguments
    ///
    /// * `instance` - The render instance.
    /// * `content` - The content to write to the buffer.
    /// * `offset` - The offset to write the content to.
    pub fn write(&self, instance: &RenderInstance, content: &[u8], offset: usize) {
        trace!("Writing to '{}' Buffer.", self.label);

        instance.queue.write_buffer(&self.buffer, offset as u64, content);
    }

    /// Size of the buffer in bytes.
    pub fn size(&self) -> u64 {
        self.buffer.size()
    }
}

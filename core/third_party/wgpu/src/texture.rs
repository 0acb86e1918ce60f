use wde_logger::info;

use crate::RenderInstance;

/// Texture view
pub type TextureView = wgpu::TextureView;

/// Texture usages.
pub type TextureUsages = wgpu::TextureUsages;

/// Texture format.
pub type TextureFormat = wgpu::TextureFormat;

/// Texture struct.
pub struct Texture {
    pub label: String,
    pub texture: wgpu::Texture,
    pub view: TextureView,
    pub size: (u32, u32),
}

impl std::fmt::Debug for Texture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Texture")
            .field("label", &self.label)
            .field("size", &self.size)
            .finish()
    }
}

impl Texture {
    /// The depth texture format.
    pub const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth32Float;

    /// Create a new texture.
    ///
    /// # Arguments
    ///
    /// * `instance` - Render instance.
    /// * `label` - Label of the texture.
    /// * `size` - Size of the texture, clamped to at least one pixel.
    /// * `format` - Format of the texture.
    /// * `usage` - Usage of the texture.
    #[tracing::instrument]
    pub fn new(instance: &RenderInstance, label: &str, size: (u32, u32), format: TextureFormat, usage: TextureUsages) -> Self {
        info!(label, "Creating texture.");
        let size = (size.0.max(1), size.1.max(1));

        let texture = instance.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(format!("'{}' Texture", label).as_str()),
            size: wgpu::Extent3d {
                width: size.0,
                height: size.1,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage,
            view_formats: &[]
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some(format!("'{}' Texture View", label).as_str()),
            ..Default::default()
        });

        Self {
            label: label.to_string(),
            texture,
            view,
            size,
        }
    }

    /// Create a depth texture matching a surface size.
    pub fn depth(instance: &RenderInstance, label: &str, size: (u32, u32)) -> Self {
        Texture::new(instance, label, size, Self::DEPTH_FORMAT, TextureUsages::RENDER_ATTACHMENT)
    }
}

impl Drop for Texture {
    #[tracing::instrument]
    fn drop(&mut self) {
        info!(self.label, "Dropping texture.");
    }
}

use tracing::{span, Level};
use wde_logger::{debug, trace, warn, error, throw, info};

use crate::{Window, TextureView};

/// Error type of the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderError {
    /// Cannot present render texture.
    CannotPresent,
    /// Cannot resize render instance.
    CannotResize,
    /// Pipeline not set.
    PipelineNotSet,
    /// Pipeline not initialized.
    PipelineNotInitialized,
    /// Missing a shader.
    MissingShader,
    /// Missing a vertex buffer.
    MissingVertexBuffer,
    /// Missing an index buffer.
    MissingIndexBuffer,
}

/// Type of the render texture.
#[derive(Debug)]
pub struct RenderTexture {
    /// Texture of the render texture.
    pub texture: wgpu::SurfaceTexture,
    /// View of the render texture.
    pub view: TextureView,
}

/// Type of the render event.
#[derive(Debug)]
pub enum RenderEvent {
    /// Redraw the window.
    Redraw(RenderTexture),
    /// Close the window.
    Close,
    /// Resize the window.
    Resize(u32, u32),
    /// No event.
    None,
}

/// Instance of the GPU device required for the renderer.
///
/// # Example
///
/// ```ignore
/// let mut instance = RenderInstance::new("Terrain", &window).await;
///
/// // Get current texture
/// if let RenderEvent::Redraw(render_texture) = RenderInstance::get_current_texture(&instance) {
///     // Render to texture
///     (...)
///
///     // Present texture
///     instance.present(render_texture);
/// }
/// ```
pub struct RenderInstance {
    /// Label of the instance.
    pub label: String,
    /// Instance of the GPU device.
    pub device: wgpu::Device,
    /// Queue for the GPU device.
    pub queue: wgpu::Queue,
    /// Surface of the GPU device.
    pub surface: Option<wgpu::Surface<'static>>,
    /// Surface configuration of the GPU device.
    pub surface_config: Option<wgpu::SurfaceConfiguration>,
}

impl std::fmt::Debug for RenderInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderInstance")
            .field("label", &self.label)
            .field("surface_config", &self.surface_config)
            .finish()
    }
}

impl RenderInstance {
    /// Create a new instance of the GPU device, presenting to the window.
    /// Panics if no adapter or device can be found.
    ///
    /// # Arguments
    ///
    /// * `label` - Label of the instance.
    /// * `window` - Created window of the instance.
    #[tracing::instrument]
    pub async fn new(label: &str, window: &Window) -> Self {
        info!(label, "Creating render instance.");

        // Create wgpu instance
        trace!(label, "Creating wgpu instance.");
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        // Retrieve surface and adapter
        trace!(label, "Retrieving surface and adapter.");
        let window_ref = match window.window.as_ref() {
            Some(window_ref) => window_ref.clone(),
            None => throw!("Cannot create render instance without a window for '{}'.", label),
        };
        let surface = instance.create_surface(window_ref)
            .unwrap_or_else(|e| throw!("Failed to create surface for '{}': {:?}.", label, e));
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .unwrap_or_else(|| throw!("Failed to create adapter for '{}'.", label));
        debug!(label, adapter = ?adapter.get_info().name, "Selected adapter.");

        // Create device instance and queue
        trace!(label, "Requesting device.");
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some(label),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default().using_resolution(adapter.limits()),
                },
                None,
            )
            .await
            .unwrap_or_else(|e| throw!("Failed to create device for '{}': {:?}.", label, e));

        // Retrieve surface format (sRGB if possible)
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = match surface_caps.formats.iter().copied().find(|f| f.is_srgb()) {
            Some(format) => format,
            None => match surface_caps.formats.first() {
                Some(format) => *format,
                None => throw!("Surface of '{}' is not supported by the adapter.", label),
            },
        };

        // Set surface configuration
        trace!(label, "Configuring surface.");
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: window.init_size.0.max(1),
            height: window.init_size.1.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes.first().copied().unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        RenderInstance {
            label: label.to_string(),
            device,
            queue,
            surface: Some(surface),
            surface_config: Some(surface_config)
        }
    }

    /// Format of the textures presented to the surface.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_config.as_ref()
            .map(|config| config.format)
            .unwrap_or(wgpu::TextureFormat::Bgra8UnormSrgb)
    }

    /// Current size of the surface.
    pub fn surface_size(&self) -> (u32, u32) {
        self.surface_config.as_ref()
            .map(|config| (config.width, config.height))
            .unwrap_or((1, 1))
    }

    /// Get the render texture.
    ///
    /// # Arguments
    ///
    /// * `render_instance` - Instance of the render.
    ///
    /// # Returns
    ///
    /// * `RenderEvent` - Render event.
    #[tracing::instrument]
    pub fn get_current_texture(render_instance: &RenderInstance) -> RenderEvent {
        let Some(surface) = render_instance.surface.as_ref() else {
            warn!(render_instance.label, "Cannot render to texture without a surface.");
            return RenderEvent::None;
        };

        // Get current texture
        let _get_current_texture = span!(Level::INFO, "acquire_texture").entered();
        let render_texture = surface.get_current_texture();
        drop(_get_current_texture);

        match render_texture {
            Ok(surface_texture) => {
                trace!(render_instance.label, "Creating render view.");
                let view = surface_texture.texture.create_view(&wgpu::TextureViewDescriptor {
                    label: Some("Render Texture"),
                    format: Some(render_instance.surface_format()),
                    dimension: Some(wgpu::TextureViewDimension::D2),
                    ..Default::default()
                });
                RenderEvent::Redraw(RenderTexture {
                    texture: surface_texture,
                    view,
                })
            }
            // Surface lost or outdated (minimized or moved to another screen)
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let (width, height) = render_instance.surface_size();
                RenderEvent::Resize(width, height)
            },
            // System out of memory
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!(render_instance.label, "System out of memory.");
                RenderEvent::Close
            },
            // Timeout of the surface
            Err(wgpu::SurfaceError::Timeout) => {
                warn!(render_instance.label, "Timeout of the surface.");
                RenderEvent::None
            },
            #[allow(unreachable_patterns)]
            Err(e) => {
                warn!(render_instance.label, "Cannot acquire surface texture : {:?}.", e);
                RenderEvent::None
            },
        }
    }

    /// Present the render texture.
    /// This must be called after the render function.
    ///
    /// # Arguments
    ///
    /// * `render_texture` - Render texture to present.
    ///
    /// # Errors
    ///
    /// * `RenderError::CannotPresent` - Cannot present render texture.
    #[tracing::instrument]
    pub fn present(&self, render_texture: RenderTexture) -> Result<(), RenderError> {
        if self.surface.is_none() {
            error!(self.label, "Cannot present render texture without a surface.");
            return Err(RenderError::CannotPresent);
        }

        debug!(self.label, "Presenting render texture.");
        render_texture.texture.present();
        Ok(())
    }

    /// Resize the surface of the instance.
    /// This must be called when the window is resized. Null sizes are ignored.
    ///
    /// # Arguments
    ///
    /// * `width` - New width of the surface.
    /// * `height` - New height of the surface.
    ///
    /// # Errors
    ///
    /// * `RenderError::CannotResize` - Cannot resize render instance surface.
    #[tracing::instrument]
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        trace!(self.label, width, height, "Resizing render instance.");
        let (Some(surface), Some(config)) = (self.surface.as_ref(), self.surface_config.as_mut()) else {
            error!(self.label, "Cannot resize render instance without a surface.");
            return Err(RenderError::CannotResize);
        };
        if width == 0 || height == 0 {
            return Ok(());
        }

        config.width = width;
        config.height = height;
        surface.configure(&self.device, config);
        Ok(())
    }
}

impl Drop for RenderInstance {
    #[tracing::instrument]
    fn drop(&mut self) {
        info!(self.label, "Dropping render instance.");
    }
}

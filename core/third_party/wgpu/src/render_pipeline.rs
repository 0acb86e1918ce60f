use std::fmt::Formatter;

use wde_logger::{trace, error, info};

use crate::{BindGroupBuilder, RenderError, RenderInstance, Texture, Vertex};

/// List of available shaders.
#[derive(Clone, Copy, Debug)]
pub enum ShaderType {
    /// Vertex shader.
    Vertex,
    /// Fragment shader.
    Fragment
}

/// Faces discarded by the rasterizer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CullMode {
    /// Draw both faces.
    None,
    Front,
    Back,
}

/// Type of the render pipeline.
pub type RenderPipelineRef = wgpu::RenderPipeline;

// Render pipeline configuration
struct RenderPipelineConfig {
    depth_stencil: bool,
    cull_mode: CullMode,
    bind_groups: Vec<(String, Vec<wgpu::BindGroupLayoutEntry>)>,
    vertex_shader: String,
    fragment_shader: String,
}

impl std::fmt::Debug for RenderPipelineConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderPipelineConfig")
            .field("depth_stencil", &self.depth_stencil)
            .field("cull_mode", &self.cull_mode)
            .field("bind_groups", &self.bind_groups.iter().map(|(label, _)| label).collect::<Vec<_>>())
            .finish()
    }
}


/// Stores a render pipeline.
/// Shaders use `main` as their entry point.
///
/// # Example
///
/// ```ignore
/// let mut pipeline = RenderPipeline::new("Terrain");
/// pipeline
///     .set_shader(&vertex_source, ShaderType::Vertex)     // Set the vertex shader
///     .set_shader(&fragment_source, ShaderType::Fragment) // Set the fragment shader
///     .set_depth_stencil()                                // Enable depth
///     .set_cull_mode(CullMode::None)                      // Double sided
///     .add_bind_group(&camera_builder);                   // Add a bind group layout
/// pipeline.init(&instance)?;                              // Initialize the pipeline
/// ```
pub struct RenderPipeline {
    pub label: String,
    pipeline: Option<RenderPipelineRef>,
    config: RenderPipelineConfig,
}

impl std::fmt::Debug for RenderPipeline {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderPipeline")
            .field("label", &self.label)
            .field("config", &self.config)
            .finish()
    }
}

impl RenderPipeline {
    /// Create a new render pipeline.
    /// By default, the render pipeline does not have a depth or stencil and culls back faces.
    ///
    /// # Arguments
    ///
    /// * `label` - Label of the render pipeline for debugging.
    #[tracing::instrument]
    pub fn new(label: &str) -> Self {
        info!(label, "Creating render pipeline.");

        Self {
            label: label.to_string(),
            pipeline: None,
            config: RenderPipelineConfig {
                depth_stencil: false,
                cull_mode: CullMode::Back,
                bind_groups: Vec::new(),
                vertex_shader: String::new(),
                fragment_shader: String::new(),
            },
        }
    }

    /// Set a given shader.
    ///
    /// # Arguments
    ///
    /// * `shader` - The WGSL shader source code.
    /// * `shader_type` - The shader type.
    pub fn set_shader(&mut self, shader: &str, shader_type: ShaderType) -> &mut Self {
        match shader_type {
            ShaderType::Vertex => self.config.vertex_shader = shader.to_string(),
            ShaderType::Fragment => self.config.fragment_shader = shader.to_string(),
        };
        self
    }

    /// Set the render pipeline to use a depth buffer.
    pub fn set_depth_stencil(&mut self) -> &mut Self {
        self.config.depth_stencil = true;
        self
    }

    /// Set the faces discarded by the rasterizer.
    pub fn set_cull_mode(&mut self, cull_mode: CullMode) -> &mut Self {
        self.config.cull_mode = cull_mode;
        self
    }

    /// Add a bind group layout to the render pipeline.
    /// The order of the bind groups is the order of the groups in the shaders.
    ///
    /// # Arguments
    ///
    /// * `builder` - The builder of the bind group.
    pub fn add_bind_group(&mut self, builder: &BindGroupBuilder) -> &mut Self {
        self.config.bind_groups.push((builder.label().to_string(), builder.layout_entries().to_vec()));
        self
    }

    /// Initialize the render pipeline.
    /// Color targets use the surface format of the instance.
    ///
    /// # Arguments
    ///
    /// * `instance` - Render instance.
    ///
    /// # Errors
    ///
    /// * `RenderError::MissingShader` - The vertex or fragment shader is not set.
    #[tracing::instrument]
    pub fn init(&mut self, instance: &RenderInstance) -> Result<(), RenderError> {
        trace!(self.label, "Initializing render pipeline.");
        let d = &self.config;

        if d.vertex_shader.is_empty() || d.fragment_shader.is_empty() {
            error!(self.label, "Pipeline does not have a vertex or fragment shader.");
            return Err(RenderError::MissingShader);
        }

        // Load shaders
        trace!(self.label, "Loading shaders.");
        let shader_module_vert = instance.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(format!("'{}' Render Pipeline Vertex Shader", self.label).as_str()),
            source: wgpu::ShaderSource::Wgsl(d.vertex_shader.as_str().into())
        });
        let shader_module_frag = instance.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(format!("'{}' Render Pipeline Fragment Shader", self.label).as_str()),
            source: wgpu::ShaderSource::Wgsl(d.fragment_shader.as_str().into())
        });

        // Create pipeline layout
        trace!(self.label, "Creating render pipeline instance.");
        let bind_group_layouts = d.bind_groups.iter()
            .map(|(label, entries)| instance.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some(format!("'{}' Bind Group Layout", label).as_str()),
                entries,
            }))
            .collect::<Vec<_>>();
        let layout = instance.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(format!("'{}' Render Pipeline Layout", self.label).as_str()),
            bind_group_layouts: &bind_group_layouts.iter().collect::<Vec<&wgpu::BindGroupLayout>>(),
            push_constant_ranges: &[],
        });

        // Create pipeline
        let pipeline = instance.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(format!("'{}' Render Pipeline", self.label).as_str()),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader_module_vert,
                entry_point: "main",
                buffers: &[Vertex::describe()]
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader_module_frag,
                entry_point: "main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: instance.surface_format(),
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: match d.cull_mode {
                    CullMode::None => None,
                    CullMode::Front => Some(wgpu::Face::Front),
                    CullMode::Back => Some(wgpu::Face::Back),
                },
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
                unclipped_depth: false,
            },
            depth_stencil: if d.depth_stencil { Some(wgpu::DepthStencilState {
                format: Texture::DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }) } else { None },
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        self.pipeline = Some(pipeline);
        Ok(())
    }

    /// Get the render pipeline, if initialized.
    pub fn get_pipeline(&self) -> Option<&RenderPipelineRef> {
        self.pipeline.as_ref()
    }
}

impl Drop for RenderPipeline {
    fn drop(&mut self) {
        info!(self.label, "Dropping render pipeline.");
    }
}

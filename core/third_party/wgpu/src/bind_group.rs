use wde_logger::trace;

use crate::{RenderInstance, Buffer, BufferBindingType};

/// Type for a bind group layout.
pub type BindGroupLayout = wgpu::BindGroupLayout;

/// Shader stages that can access a binding.
pub type ShaderStages = wgpu::ShaderStages;


/// Builder for a bind group.
#[derive(Clone)]
pub struct BindGroupBuilder<'a> {
    label: String,
    layout_entries: Vec<wgpu::BindGroupLayoutEntry>,
    group_entries: Vec<wgpu::BindGroupEntry<'a>>,
}

impl<'a> BindGroupBuilder<'a> {
    /// Create a new bind group builder.
    ///
    /// # Arguments
    ///
    /// * `label` - The label of the bind group.
    pub fn new(label: &str) -> Self {
        BindGroupBuilder {
            label: label.to_string(),
            layout_entries: Vec::new(),
            group_entries: Vec::new(),
        }
    }

    /// Add a buffer to the bind group.
    ///
    /// # Arguments
    ///
    /// * `binding` - The binding index of the buffer.
    /// * `buffer` - The buffer to add to the bind group.
    /// * `visibility` - The shader stages that can access the buffer.
    /// * `binding_type` - The type of the buffer binding.
    pub fn add_buffer(&mut self, binding: u32, buffer: &'a Buffer, visibility: ShaderStages, binding_type: BufferBindingType) -> &mut Self {
        self.layout_entries.push(wgpu::BindGroupLayoutEntry {
            binding,
            visibility,
            ty: wgpu::BindingType::Buffer {
                has_dynamic_offset: false,
                min_binding_size: None,
                ty: binding_type,
            },
            count: None,
        });
        self.group_entries.push(wgpu::BindGroupEntry {
            binding,
            resource: buffer.buffer.as_entire_binding(),
        });

        self
    }

    /// Layout entries of the bind group, used to describe pipeline layouts.
    pub fn layout_entries(&self) -> &[wgpu::BindGroupLayoutEntry] {
        &self.layout_entries
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}



/// Structure for a bind group.
///
/// # Example
///
/// ```ignore
/// let mut builder = BindGroupBuilder::new("Camera");
/// builder.add_buffer(0, &buffer, ShaderStages::VERTEX, BufferBindingType::Uniform);
///
/// let bind_group = BindGroup::new(&instance, builder);
/// ```
#[derive(Debug)]
pub struct BindGroup {
    pub label: String,
    pub layout: BindGroupLayout,
    pub group: wgpu::BindGroup,
}

impl BindGroup {
    /// Creates a new bind group.
    ///
    /// # Arguments
    ///
    /// * `instance` - The render instance.
    /// * `builder` - The bind group builder.
    pub fn new(instance: &RenderInstance, builder: BindGroupBuilder) -> Self {
        trace!(builder.label, "Creating bind group.");

        let layout = instance.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some(format!("'{}' Bind Group Layout", builder.label).as_str()),
                entries: &builder.layout_entries,
            }
        );
        let group = instance.device.create_bind_group(
            &wgpu::BindGroupDescriptor {
                label: Some(format!("'{}' Bind Group", builder.label).as_str()),
                layout: &layout,
                entries: &builder.group_entries,
            }
        );

        BindGroup {
            label: builder.label,
            layout,
            group,
        }
    }
}

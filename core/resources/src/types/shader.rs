use std::any::Any;

use wde_logger::{debug, info};

use crate::{fetch_bytes, AsyncLoad, LoadError, Resource, ResourceDescription, ResourceType};

/// Store a WGSL shader source loaded from a file.
/// This resource is loaded asynchronously.
/// The source is stored in the `data` field when loaded.
pub struct ShaderResource {
    /// Label of the shader.
    pub label: String,
    /// Path of the shader file.
    pub path: String,
    /// Shader source.
    pub data: Option<String>,

    async_load: AsyncLoad<String>,
}

impl std::fmt::Debug for ShaderResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShaderResource")
            .field("label", &self.label)
            .field("path", &self.path)
            .field("loaded", &self.data.is_some())
            .field("async_load", &self.async_load)
            .finish()
    }
}

impl Resource for ShaderResource {
    #[tracing::instrument]
    fn new(desc: ResourceDescription) -> Self {
        info!(desc.label, "Creating shader resource.");

        let path = desc.source.clone();
        let async_load = AsyncLoad::spawn(&desc.label, async move {
            let content = fetch_bytes(&path).await?;
            let source = String::from_utf8(content)
                .map_err(|_| LoadError::Encoding { location: path.clone() })?;

            debug!(path, "Shader is async loaded.");
            Ok::<_, LoadError>(source)
        });

        Self {
            label: desc.label,
            path: desc.source,
            data: None,
            async_load,
        }
    }

    fn sync_load(&mut self) -> Result<(), LoadError> {
        debug!(self.label, "Sync loading shader.");
        self.data = Some(self.async_load.take()?);
        Ok(())
    }

    // Inherited methods
    fn async_loaded(&self) -> bool { self.async_load.done() }
    fn loaded(&self) -> bool { self.data.is_some() }
    fn label(&self) -> &str { &self.label }
    fn resource_type() -> ResourceType { ResourceType::Shader }
    fn as_any(&self) -> &dyn Any { self }
}

impl Drop for ShaderResource {
    fn drop(&mut self) {
        info!(self.label, "Unloading shader resource.");
    }
}

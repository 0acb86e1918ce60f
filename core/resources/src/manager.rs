use std::{collections::HashMap, time::Duration};

use wde_logger::{debug, error};

use crate::{LoadError, Resource, ResourceDescription, ResourceType};

/// Index of a resource in the manager.
type ResourceIndex = usize;

/// Points to a resource stored in the manager.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceHandle {
    /// Label of the resource
    pub label: String,
    /// Type of the resource
    pub resource_type: ResourceType,
    /// Index of the resource
    index: ResourceIndex,
}

/// Resources manager.
/// Stores all the resources loaded by the application.
/// A source loaded twice with the same type is only loaded once.
///
/// # Example
///
/// ```ignore
/// let mut res_manager = ResourcesManager::new();
/// let handle = res_manager.load::<ShaderResource>(ResourceDescription::new(
///     "Terrain vertex", ResourceType::Shader, "res/shaders/terrain/vert.wgsl"));
///
/// // Wait for every resource
/// res_manager.wait_loaded().await?;
/// let shader = res_manager.get::<ShaderResource>(&handle);
/// ```
#[derive(Default)]
pub struct ResourcesManager {
    resources: Vec<Box<dyn Resource>>,
    source_to_index: HashMap<(ResourceType, String), ResourceIndex>,
}

impl std::fmt::Debug for ResourcesManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourcesManager")
            .field("resources", &self.resources.len())
            .finish()
    }
}

impl ResourcesManager {
    /// Create a new resources manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start loading a resource.
    /// If the resource is already known, returns a handle to it.
    ///
    /// # Arguments
    ///
    /// * `desc` - Description of the resource.
    ///
    /// # Returns
    ///
    /// * `ResourceHandle` - Handle pointing to the resource.
    pub fn load<R: Resource>(&mut self, desc: ResourceDescription) -> ResourceHandle {
        let key = (R::resource_type(), desc.source.clone());
        if let Some(&index) = self.source_to_index.get(&key) {
            return ResourceHandle {
                label: desc.label,
                resource_type: R::resource_type(),
                index,
            };
        }

        let label = desc.label.clone();
        let index = self.resources.len();
        self.resources.push(Box::new(R::new(desc)));
        self.source_to_index.insert(key, index);

        ResourceHandle {
            label,
            resource_type: R::resource_type(),
            index,
        }
    }

    /// Finish the loading of the resources whose async part is done.
    ///
    /// # Errors
    ///
    /// The first loading error encountered.
    pub fn update(&mut self) -> Result<(), LoadError> {
        for resource in self.resources.iter_mut() {
            if resource.async_loaded() && !resource.loaded() {
                if let Err(e) = resource.sync_load() {
                    error!(label = resource.label(), "Failed to load resource : {}.", e);
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    /// Check whether every resource is loaded.
    pub fn loaded(&self) -> bool {
        self.resources.iter().all(|resource| resource.loaded())
    }

    /// Wait until every resource is loaded.
    ///
    /// # Errors
    ///
    /// The first loading error encountered.
    #[tracing::instrument]
    pub async fn wait_loaded(&mut self) -> Result<(), LoadError> {
        loop {
            self.update()?;
            if self.loaded() {
                debug!("Every resource is loaded.");
                return Ok(());
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    /// Get a resource from a resource handle.
    ///
    /// # Returns
    ///
    /// The resource, or `None` if the handle does not point to a resource of type `R`.
    pub fn get<R: Resource>(&self, handle: &ResourceHandle) -> Option<&R> {
        if handle.resource_type != R::resource_type() {
            error!(handle.label, "Resource handle has the wrong type.");
            return None;
        }
        self.resources.get(handle.index)?.as_any().downcast_ref::<R>()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::tests::float_tiff;
    use crate::{HeightmapResource, ShaderResource};

    #[tokio::test]
    async fn loads_shader_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vert.wgsl");
        std::fs::write(&path, "@vertex fn main() {}").unwrap();

        let mut manager = ResourcesManager::new();
        let handle = manager.load::<ShaderResource>(ResourceDescription::new(
            "Vertex", ResourceType::Shader, path.to_str().unwrap()));
        manager.wait_loaded().await.unwrap();

        let shader = manager.get::<ShaderResource>(&handle).unwrap();
        assert_eq!(shader.data.as_deref(), Some("@vertex fn main() {}"));
    }

    #[tokio::test]
    async fn loads_heightmap() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dem.tif");
        std::fs::write(&path, float_tiff(2, 2, &[0.0, 10.0, 20.0, 30.0], None)).unwrap();

        let mut manager = ResourcesManager::new();
        let handle = manager.load::<HeightmapResource>(ResourceDescription::new(
            "Heightmap", ResourceType::Heightmap, path.to_str().unwrap()));
        manager.wait_loaded().await.unwrap();

        let data = manager.get::<HeightmapResource>(&handle).unwrap().data.as_ref().unwrap();
        assert_eq!((data.width, data.height, data.bands), (2, 2, 1));
        assert_eq!(data.grid.samples(), &[0.0, 10.0, 20.0, 30.0]);
    }

    #[tokio::test]
    async fn reports_decode_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.tif");
        std::fs::write(&path, b"not a raster").unwrap();

        let mut manager = ResourcesManager::new();
        manager.load::<HeightmapResource>(ResourceDescription::new(
            "Heightmap", ResourceType::Heightmap, path.to_str().unwrap()));

        let res = manager.wait_loaded().await;
        assert!(matches!(res, Err(LoadError::Decode(_))));
    }

    #[tokio::test]
    async fn reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.tif");

        let mut manager = ResourcesManager::new();
        manager.load::<HeightmapResource>(ResourceDescription::new(
            "Heightmap", ResourceType::Heightmap, path.to_str().unwrap()));

        let res = manager.wait_loaded().await;
        assert!(matches!(res, Err(LoadError::Io { .. })));
    }

    #[tokio::test]
    async fn same_source_is_loaded_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frag.wgsl");
        std::fs::write(&path, "@fragment fn main() {}").unwrap();
        let source = path.to_str().unwrap();

        let mut manager = ResourcesManager::new();
        let a = manager.load::<ShaderResource>(ResourceDescription::new("A", ResourceType::Shader, source));
        let b = manager.load::<ShaderResource>(ResourceDescription::new("B", ResourceType::Shader, source));
        assert_eq!(a.index, b.index);
        assert_eq!(manager.resources.len(), 1);

        manager.wait_loaded().await.unwrap();
        assert!(manager.get::<HeightmapResource>(&a).is_none());
    }
}

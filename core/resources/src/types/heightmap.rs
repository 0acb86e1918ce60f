use std::any::Any;

use wde_logger::{debug, info};
use wde_terrain::ElevationGrid;

use crate::{fetch_bytes, AsyncLoad, LoadError, RasterImage, Resource, ResourceDescription, ResourceType};

/// Decoded heightmap.
#[derive(Debug, Clone)]
pub struct HeightmapData {
    /// Elevation samples of the first band.
    pub grid: ElevationGrid,
    /// Raster width in pixels.
    pub width: u32,
    /// Raster height in pixels.
    pub height: u32,
    /// Number of bands of the raster.
    pub bands: usize,
}

/// Store a heightmap fetched from a URL or a file and decoded from GeoTIFF.
/// Fetching and decoding happen asynchronously, decoding on a blocking thread.
pub struct HeightmapResource {
    /// Label of the heightmap.
    pub label: String,
    /// URL or path of the raster.
    pub source: String,
    /// Heightmap data.
    pub data: Option<HeightmapData>,

    async_load: AsyncLoad<HeightmapData>,
}

impl std::fmt::Debug for HeightmapResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeightmapResource")
            .field("label", &self.label)
            .field("source", &self.source)
            .field("loaded", &self.data.is_some())
            .field("async_load", &self.async_load)
            .finish()
    }
}

/// Fetch and decode a heightmap.
async fn load_heightmap(label: String, source: String) -> Result<HeightmapData, LoadError> {
    let bytes = fetch_bytes(&source).await?;

    let decoded = tokio::task::spawn_blocking(move || {
        let image = RasterImage::decode(&bytes)?;
        let grid = image.read_samples()?;
        Ok::<_, LoadError>(HeightmapData {
            grid,
            width: image.width(),
            height: image.height(),
            bands: image.bands(),
        })
    }).await.map_err(|_| LoadError::Interrupted { label })?;

    if let Ok(data) = decoded.as_ref() {
        debug!(source, width = data.width, height = data.height, "Heightmap is async loaded.");
    }
    decoded
}

impl Resource for HeightmapResource {
    #[tracing::instrument]
    fn new(desc: ResourceDescription) -> Self {
        info!(desc.label, desc.source, "Creating heightmap resource.");

        let async_load = AsyncLoad::spawn(
            &desc.label,
            load_heightmap(desc.label.clone(), desc.source.clone()));

        Self {
            label: desc.label,
            source: desc.source,
            data: None,
            async_load,
        }
    }

    fn sync_load(&mut self) -> Result<(), LoadError> {
        debug!(self.label, "Sync loading heightmap.");
        self.data = Some(self.async_load.take()?);
        Ok(())
    }

    // Inherited methods
    fn async_loaded(&self) -> bool { self.async_load.done() }
    fn loaded(&self) -> bool { self.data.is_some() }
    fn label(&self) -> &str { &self.label }
    fn resource_type() -> ResourceType { ResourceType::Heightmap }
    fn as_any(&self) -> &dyn Any { self }
}

impl Drop for HeightmapResource {
    fn drop(&mut self) {
        info!(self.label, "Unloading heightmap resource.");
    }
}

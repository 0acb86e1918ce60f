use wde_logger::info;
use wde_resources::HeightmapData;
use wde_terrain::{build_terrain, MeshGrid};

use crate::{Camera, Light, Material, TerrainConfig};

/// Describes the scene of the viewer.
/// Built once the heightmap is loaded, then handed to the renderer every frame.
#[derive(Debug)]
pub struct Scene {
    /// The fixed camera
    pub camera: Camera,
    /// The directional light
    pub light: Light,
    /// Material of the terrain
    pub material: Material,
    /// The terrain mesh
    pub terrain: MeshGrid,
    /// Background color
    pub clear_color: [f64; 4],
}

impl Scene {
    /// Create a new scene.
    ///
    /// # Arguments
    ///
    /// * `config` - The viewer configuration
    /// * `heightmap` - The decoded heightmap
    /// * `surface_size` - Size of the render surface
    #[tracing::instrument(skip(config, heightmap))]
    pub fn new(config: &TerrainConfig, heightmap: &HeightmapData, surface_size: (u32, u32)) -> Self {
        let (width, height) = config.world_size((heightmap.width, heightmap.height));
        let terrain = build_terrain(&heightmap.grid, width, height, config.elevation_scale);
        info!(vertices = terrain.vertices().len(), triangles = terrain.indices().len() / 3, "Created terrain.");

        Self {
            camera: Camera::new(&config.camera, surface_size),
            light: Light::new(&config.light),
            material: Material::new(&config.material),
            terrain,
            clear_color: config.clear_color,
        }
    }

    /// Follow the size of the surface.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.set_aspect(width, height);
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use wde_terrain::ElevationGrid;

    fn heightmap() -> HeightmapData {
        HeightmapData {
            grid: ElevationGrid::from_rows(&[vec![0.0, 10.0], vec![20.0, 30.0]]).unwrap(),
            width: 2,
            height: 2,
            bands: 1,
        }
    }

    #[test]
    fn builds_terrain_from_heightmap() {
        let scene = Scene::new(&TerrainConfig::default(), &heightmap(), (800, 600));

        assert_eq!((scene.terrain.rows(), scene.terrain.cols()), (2, 2));
        assert_eq!(scene.terrain.width(), 2.0);
        assert_eq!(scene.terrain.elevation(1, 1), Some(50.0));
        assert!(scene.terrain.is_dirty());
    }

    #[test]
    fn uses_configured_world_size() {
        let config = TerrainConfig { world_size: Some([100.0, 40.0]), elevation_scale: 10.0, ..Default::default() };
        let scene = Scene::new(&config, &heightmap(), (800, 600));

        let bbox = scene.terrain.bounding_box();
        assert_eq!(bbox.min, [-50.0, 0.0, -20.0]);
        assert_eq!(bbox.max, [50.0, 10.0, 20.0]);
    }

    #[test]
    fn resize_updates_camera() {
        let mut scene = Scene::new(&TerrainConfig::default(), &heightmap(), (800, 600));
        scene.resize(600, 600);
        assert_eq!(scene.camera.aspect, 1.0);
    }
}

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wde_logger::{info, warn};

/// Default configuration file, next to the executable.
pub const CONFIG_FILE: &str = "res/config.json";

/// Errors raised while reading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}' : {error}")]
    Io {
        path: String,
        #[source]
        error: std::io::Error,
    },
    #[error("malformed config file '{path}' : {error}")]
    Parse {
        path: String,
        #[source]
        error: serde_json::Error,
    },
}

/// Window settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "Terrain".to_string(),
        }
    }
}

/// Fixed perspective camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub target: [f32; 3],
    /// Vertical field of view in degrees.
    pub fovy: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 50.0, 100.0],
            target: [0.0, 0.0, 0.0],
            fovy: 75.0,
            znear: 0.1,
            zfar: 1000.0,
        }
    }
}

/// Directional light.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    /// Direction pointing towards the light.
    pub direction: [f32; 3],
    pub color: [f32; 3],
    pub intensity: f32,
    pub ambient: f32,
    pub diffuse: f32,
    pub specular: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            direction: [0.0, 1.0, 1.0],
            color: [1.0, 1.0, 1.0],
            intensity: 1.0,
            ambient: 0.1,
            diffuse: 1.0,
            specular: 0.2,
        }
    }
}

/// Phong material of the terrain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialConfig {
    pub color: [f32; 3],
    pub shininess: f32,
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            color: [0.0, 1.0, 0.0],
            shininess: 30.0,
        }
    }
}

/// Configuration of the terrain viewer.
///
/// Every field falls back to its default when missing from the file.
///
/// # Example
///
/// ```ignore
/// {
///     "heightmap": "https://example.org/dem.tif",
///     "elevation_scale": 80.0,
///     "camera": { "position": [0.0, 120.0, 200.0] }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// URL or path of the GeoTIFF heightmap.
    pub heightmap: String,
    /// Height of the highest sample above the lowest one.
    pub elevation_scale: f32,
    /// Extent of the terrain along X and Z. Defaults to the raster size in pixels.
    pub world_size: Option<[f32; 2]>,
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub light: LightConfig,
    pub material: MaterialConfig,
    pub clear_color: [f64; 4],
    /// Minimum level of the logs.
    pub log_level: String,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            heightmap: "res/heightmaps/heightmap.tif".to_string(),
            elevation_scale: 50.0,
            world_size: None,
            window: WindowConfig::default(),
            camera: CameraConfig::default(),
            light: LightConfig::default(),
            material: MaterialConfig::default(),
            clear_color: [0.0, 0.0, 0.0, 1.0],
            log_level: "info".to_string(),
        }
    }
}

impl TerrainConfig {
    /// Read the configuration from a JSON file.
    /// A missing file gives the default configuration.
    ///
    /// # Arguments
    ///
    /// * `path` - Path of the file.
    ///
    /// # Errors
    ///
    /// * `ConfigError::Io` - The file exists but cannot be read.
    /// * `ConfigError::Parse` - The file is not a valid configuration.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let shown = path.display().to_string();

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = shown.as_str(), "Config file not found, using defaults.");
                return Ok(Self::default());
            },
            Err(error) => return Err(ConfigError::Io { path: shown, error }),
        };

        let config = serde_json::from_str(&content)
            .map_err(|error| ConfigError::Parse { path: shown.clone(), error })?;
        info!(path = shown.as_str(), "Loaded config file.");
        Ok(config)
    }

    /// Read the configuration file stored next to the executable.
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load(wde_resources::resolve_path(CONFIG_FILE))
    }

    /// Size of the terrain in world units.
    ///
    /// # Arguments
    ///
    /// * `raster_size` - Width and height of the raster in pixels.
    pub fn world_size(&self, raster_size: (u32, u32)) -> (f32, f32) {
        match self.world_size {
            Some([width, height]) => (width, height),
            None => (raster_size.0 as f32, raster_size.1 as f32),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        let config: TerrainConfig = serde_json::from_str(r#"{
            "elevation_scale": 80.0,
            "camera": { "position": [1.0, 2.0, 3.0] }
        }"#).unwrap();

        assert_eq!(config.elevation_scale, 80.0);
        assert_eq!(config.camera.position, [1.0, 2.0, 3.0]);
        assert_eq!(config.camera.fovy, 75.0);
        assert_eq!(config.camera.zfar, 1000.0);
        assert_eq!(config.material, MaterialConfig::default());
        assert_eq!(config.heightmap, TerrainConfig::default().heightmap);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = TerrainConfig::load(dir.path().join("config.json")).unwrap();
        assert_eq!(config, TerrainConfig::default());
    }

    #[test]
    fn malformed_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ \"elevation_scale\": \"high\" }").unwrap();

        assert!(matches!(TerrainConfig::load(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn shipped_config_matches_defaults() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../res/config.json");
        assert_eq!(TerrainConfig::load(path).unwrap(), TerrainConfig::default());
    }

    #[test]
    fn world_size_defaults_to_raster() {
        let mut config = TerrainConfig::default();
        assert_eq!(config.world_size((300, 200)), (300.0, 200.0));

        config.world_size = Some([10.0, 5.0]);
        assert_eq!(config.world_size((300, 200)), (10.0, 5.0));
    }
}

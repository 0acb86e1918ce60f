use wde_math::{InnerSpace, Vec3f, UP_VEC3F};

use crate::{LightConfig, MaterialConfig};

/// Directional light.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Light {
    /// Unit direction pointing towards the light.
    pub direction: Vec3f,
    pub color: [f32; 3],
    pub intensity: f32,
    pub ambient: f32,
    pub diffuse: f32,
    pub specular: f32,
}

impl Light {
    pub fn new(config: &LightConfig) -> Self {
        let direction = Vec3f::from(config.direction);
        let direction = if direction.magnitude2() > f32::EPSILON {
            direction.normalize()
        } else {
            UP_VEC3F
        };

        Self {
            direction,
            color: config.color,
            intensity: config.intensity,
            ambient: config.ambient,
            diffuse: config.diffuse,
            specular: config.specular,
        }
    }
}

/// Light uniform buffer.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    // Towards the light, w is unused
    pub direction: [f32; 4],
    // Color times intensity, w is unused
    pub color: [f32; 4],
    // Ambient, diffuse and specular strengths
    pub strengths: [f32; 4],
}

impl From<&Light> for LightUniform {
    fn from(light: &Light) -> Self {
        let [r, g, b] = light.color;
        Self {
            direction: [light.direction.x, light.direction.y, light.direction.z, 0.0],
            color: [r * light.intensity, g * light.intensity, b * light.intensity, 1.0],
            strengths: [light.ambient, light.diffuse, light.specular, 0.0],
        }
    }
}


/// Solid color Phong material, lit on both faces.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Material {
    pub color: [f32; 3],
    pub shininess: f32,
}

impl Material {
    pub fn new(config: &MaterialConfig) -> Self {
        Self {
            color: config.color,
            shininess: config.shininess.max(1.0),
        }
    }
}

/// Material uniform buffer.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    // Color in rgb, shininess in w
    pub color: [f32; 4],
}

impl From<&Material> for MaterialUniform {
    fn from(material: &Material) -> Self {
        let [r, g, b] = material.color;
        Self { color: [r, g, b, material.shininess] }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_is_normalized() {
        let light = Light::new(&LightConfig::default());
        let expected = 1.0 / 2.0_f32.sqrt();
        assert!((light.direction.y - expected).abs() < 1e-6);
        assert!((light.direction.z - expected).abs() < 1e-6);

        let light = Light::new(&LightConfig { direction: [0.0; 3], ..Default::default() });
        assert_eq!(light.direction, UP_VEC3F);
    }

    #[test]
    fn uniform_scales_color() {
        let light = Light::new(&LightConfig { intensity: 0.5, ..Default::default() });
        let uniform = LightUniform::from(&light);
        assert_eq!(&uniform.color[..3], &[0.5, 0.5, 0.5]);
    }

    #[test]
    fn material_packs_shininess() {
        let material = Material::new(&MaterialConfig::default());
        assert_eq!(MaterialUniform::from(&material).color, [0.0, 1.0, 0.0, 30.0]);
    }
}

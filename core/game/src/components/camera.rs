use wde_math::{Deg, Mat4f, Point3f, SquareMatrix, OPENGL_TO_WGPU_MATRIX, UP_VEC3F};

use crate::CameraConfig;

/// Camera uniform buffer.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    // From world to NDC coordinates
    pub world_to_screen: [[f32; 4]; 4],
    // World position of the eye, w is unused
    pub position: [f32; 4],
}

impl CameraUniform {
    /// Create a new camera uniform buffer.
    pub fn new() -> Self {
        Self {
            world_to_screen: Mat4f::identity().into(),
            position: [0.0, 0.0, 0.0, 1.0],
        }
    }

    /// Build the uniform of a camera.
    pub fn from_camera(camera: &Camera) -> Self {
        Self {
            world_to_screen: camera.world_to_screen().into(),
            position: [camera.position.x, camera.position.y, camera.position.z, 1.0],
        }
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}


/// Fixed perspective camera looking at a target.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub position: Point3f,
    pub target: Point3f,

    // Camera projection
    pub aspect: f32,
    pub fovy: f32,
    pub znear: f32,
    pub zfar: f32
}

impl Camera {
    /// Create a camera from its configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Camera configuration.
    /// * `size` - Size of the surface in pixels.
    pub fn new(config: &CameraConfig, size: (u32, u32)) -> Self {
        let mut camera = Self {
            position: Point3f::from(config.position),
            target: Point3f::from(config.target),
            aspect: 1.0,
            fovy: config.fovy,
            znear: config.znear,
            zfar: config.zfar,
        };
        camera.set_aspect(size.0, size.1);
        camera
    }

    /// Follow the size of the surface. Zero sizes are ignored.
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Get the world to screen matrix.
    ///
    /// # Returns
    ///
    /// The world to screen matrix ((openGL to WGPU) * projection * view).
    pub fn world_to_screen(&self) -> Mat4f {
        // World to camera
        let view = Mat4f::look_at_rh(self.position, self.target, UP_VEC3F);
        // Projection from camera to NDC
        let proj = wde_math::perspective(Deg(self.fovy), self.aspect, self.znear, self.zfar);
        // Convert from OpenGL to WGPU (-1.0 / 1.0 to 0.0 / 1.0)
        OPENGL_TO_WGPU_MATRIX * proj * view
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use wde_math::Vec4f;

    fn project(camera: &Camera, point: [f32; 3]) -> [f32; 3] {
        let clip = camera.world_to_screen() * Vec4f::new(point[0], point[1], point[2], 1.0);
        [clip.x / clip.w, clip.y / clip.w, clip.z / clip.w]
    }

    #[test]
    fn target_is_at_clip_center() {
        let camera = Camera::new(&CameraConfig::default(), (1280, 720));
        let ndc = project(&camera, [0.0, 0.0, 0.0]);

        assert!(ndc[0].abs() < 1e-5);
        assert!(ndc[1].abs() < 1e-5);
        assert!(ndc[2] > 0.0 && ndc[2] < 1.0);
    }

    #[test]
    fn higher_points_project_higher() {
        let camera = Camera::new(&CameraConfig::default(), (800, 600));
        let low = project(&camera, [0.0, 0.0, 0.0]);
        let high = project(&camera, [0.0, 10.0, 0.0]);
        assert!(high[1] > low[1]);
    }

    #[test]
    fn aspect_follows_resize() {
        let mut camera = Camera::new(&CameraConfig::default(), (800, 600));
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);

        camera.set_aspect(1920, 1080);
        assert!((camera.aspect - 1920.0 / 1080.0).abs() < 1e-6);

        camera.set_aspect(1920, 0);
        assert!((camera.aspect - 1920.0 / 1080.0).abs() < 1e-6);
    }

    #[test]
    fn uniform_holds_eye_position() {
        let camera = Camera::new(&CameraConfig::default(), (800, 600));
        let uniform = CameraUniform::from_camera(&camera);
        assert_eq!(uniform.position, [0.0, 50.0, 100.0, 1.0]);
    }
}

// Vectors
pub type Vec3f = cgmath::Vector3<f32>;
pub type Vec4f = cgmath::Vector4<f32>;

pub const UP_VEC3F: Vec3f = Vec3f { x: 0.0, y: 1.0, z: 0.0 };

// Points
pub type Point3f = cgmath::Point3<f32>;

// Redefine core functions
pub use cgmath::*;


// Matrices
pub type Mat4f = cgmath::Matrix4<f32>;

/// Converts OpenGL clip space (z in [-1, 1]) to wgpu clip space (z in [0, 1]).
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Mat4f = Mat4f::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

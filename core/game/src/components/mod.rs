mod camera;
mod light;

pub use camera::*;
pub use light::*;

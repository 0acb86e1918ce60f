mod heightmap;
mod shader;

pub use heightmap::*;
pub use shader::*;

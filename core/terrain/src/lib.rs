mod converter;
mod error;
mod grid;
mod mesh;

pub use converter::*;
pub use error::*;
pub use grid::*;
pub use mesh::*;

mod error;
mod fetch;
mod manager;
mod raster;
mod resource;
mod types;

pub use error::*;
pub use fetch::*;
pub use manager::*;
pub use raster::*;
pub use resource::*;
pub use types::*;

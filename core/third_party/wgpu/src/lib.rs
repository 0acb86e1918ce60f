mod instance;
mod vertex;
mod bind_group;
mod render_pipeline;
mod texture;
mod render_pass;
mod buffer;
mod command_buffer;
mod window;

pub use instance::*;
pub use vertex::*;
pub use bind_group::*;
pub use render_pipeline::*;
pub use texture::*;
pub use render_pass::*;
pub use buffer::*;
pub use command_buffer::*;
pub use window::*;

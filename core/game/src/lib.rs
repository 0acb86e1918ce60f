mod app;
mod components;
mod config;
mod render;
mod renderer;
mod scene;

pub use app::*;
pub use components::*;
pub use config::*;
pub use render::*;
pub use renderer::*;
pub use scene::*;

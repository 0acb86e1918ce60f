mod game_render_pass;
mod terrain;

pub use game_render_pass::*;
pub use terrain::*;
